//! Transform and keyframe document fields.
//!
//! Transforms are split into a `pos` translation (world-scaled) and a
//! row-major 3x3 `rotation` matrix that also carries the object's scale,
//! so the exported `scale` element is always 1. Multi-sample transform
//! tracks become `keyframe` elements interpolated over the shutter
//! interval.

use crate::document::DocNode;
use glam::Mat4;

/// Build the `rotation` element holding the matrix's upper-left 3x3 block
/// in row-major order.
pub fn rotation_field(matrix: &Mat4) -> DocNode {
    let m = matrix.to_cols_array_2d();
    // m[col][row]; emit rows
    let row_major = [
        m[0][0], m[1][0], m[2][0],
        m[0][1], m[1][1], m[2][1],
        m[0][2], m[1][2], m[2][2],
    ];
    DocNode::new("rotation").field_list("matrix", row_major)
}

/// Build the `pos` element from the matrix translation, world-scaled.
pub fn pos_field(matrix: &Mat4, world_scale: f32) -> DocNode {
    let t = matrix.w_axis;
    DocNode::scalars(
        "pos",
        [t.x * world_scale, t.y * world_scale, t.z * world_scale],
    )
}

/// Build one `keyframe` element per transform sample, in sample order.
pub fn keyframes(samples: &[(f64, Mat4)], world_scale: f32) -> Vec<DocNode> {
    samples
        .iter()
        .map(|(time, matrix)| {
            DocNode::new("keyframe")
                .field("time", *time)
                .child(pos_field(matrix, world_scale))
                .child(rotation_field(matrix))
        })
        .collect()
}
