//! Mesh export with content-addressed deduplication.
//!
//! A mesh artifact is identified by a SHA-224 fingerprint over the
//! object's material slot names (in slot order) and the evaluated mesh's
//! vertex positions (in vertex order). Order sensitivity is intentional:
//! the same vertices in a different order are a different artifact.
//! Fingerprint collisions are not detected; two objects that hash
//! identically share one artifact.

use super::material::export_material;
use super::ExportContext;
use crate::document::DocNode;
use crate::error::{ExportError, Result};
use crate::igmesh::{scan_face_stats, MeshSerializer, MeshStats};
use crate::scene::{MeshSnapshot, SceneObject, SceneSource};
use sha2::{Digest, Sha224};
use std::collections::BTreeSet;
use std::rc::Rc;
use tracing::debug;

/// A deduplicated, cached mesh export product.
#[derive(Debug, Clone)]
pub struct ExportedMesh {
    /// Fingerprint-derived artifact name; never the object's own name, so
    /// renaming an object cannot change or collide the output.
    pub name: String,
    /// The `mesh` document fragment referencing the serialized file.
    pub fragment: DocNode,
}

/// Compute the content fingerprint of an evaluated mesh.
pub fn mesh_fingerprint(obj: &SceneObject, mesh: &MeshSnapshot) -> String {
    let mut hasher = Sha224::new();

    for material in obj.materials() {
        hasher.update(material.name().as_bytes());
    }

    for v in &mesh.vertices {
        hasher.update(v.x.to_le_bytes());
        hasher.update(v.y.to_le_bytes());
        hasher.update(v.z.to_le_bytes());
    }

    let digest = hasher.finalize();
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        hex.push_str(&format!("{:02x}", byte));
    }
    hex
}

/// Export the object's evaluated mesh, reusing cached artifacts.
///
/// Repeat visits of the same object hit the object cache without
/// re-evaluating; distinct objects with identical content share one
/// artifact through the fingerprint cache. Only call this for
/// mesh-capable object kinds.
pub fn export_mesh(
    ctx: &mut ExportContext,
    scene: &dyn SceneSource,
    serializer: &dyn MeshSerializer,
    obj: &SceneObject,
) -> Result<Rc<ExportedMesh>> {
    if !obj.kind.is_mesh_capable() {
        return Err(ExportError::MeshEvaluation(
            obj.name.clone(),
            format!("unsupported object kind {:?}", obj.kind),
        ));
    }

    // Fast path: this object was already exported this run.
    if let Some(artifact) = ctx.meshes_by_object.get(&obj.id) {
        return Ok(Rc::clone(artifact));
    }

    // Transient modifier-applied snapshot; dropped on every return path.
    let mesh = scene.evaluate_mesh(obj)?;

    let fingerprint = mesh_fingerprint(obj, &mesh);

    // Cross-object dedup: identical content already on disk. Register the
    // object mapping so the checksum is not recomputed on later visits.
    if let Some(artifact) = ctx.meshes_on_disk.get(&fingerprint) {
        let artifact = Rc::clone(artifact);
        ctx.meshes_by_object.insert(obj.id, Rc::clone(&artifact));
        return Ok(artifact);
    }

    let mesh_filename = format!("{}.igmesh", fingerprint);
    let full_mesh_path = ctx.mesh_dir.join(&mesh_filename);

    let (stats, rel_path) = if obj.mesh.valid_proxy() {
        // A proxy stands in for the geometry; assume it uses every slot.
        let proxy = obj.mesh.proxy_path.as_ref().unwrap();
        let stats = MeshStats {
            used_material_indices: (0..obj.material_slots.len()).collect::<BTreeSet<_>>(),
            uses_shading_normals: true,
        };
        (stats, proxy.display().to_string())
    } else if ctx.skip_existing && full_mesh_path.exists() {
        // Skip the write, but still derive the facts from face data.
        debug!(mesh = %fingerprint, "mesh artifact exists, skipping write");
        let stats = scan_face_stats(&mesh);
        (stats, format!("{}/{}", ctx.rel_mesh_dir, mesh_filename))
    } else {
        let stats = serializer.serialize(obj, &mesh, &full_mesh_path)?;
        (stats, format!("{}/{}", ctx.rel_mesh_dir, mesh_filename))
    };

    // Fan out materials referenced by a used slot, in slot-index order.
    for mi in &stats.used_material_indices {
        if let Some(Some(material)) = obj.material_slots.get(*mi) {
            export_material(ctx, material.as_ref());
        }
    }

    let fragment = DocNode::new("mesh")
        .field("name", fingerprint.clone())
        .field("normal_smoothing", stats.uses_shading_normals)
        .child(DocNode::new("external").field("path", rel_path));

    let artifact = Rc::new(ExportedMesh {
        name: fingerprint.clone(),
        fragment,
    });
    ctx.meshes_on_disk.add(fingerprint, Rc::clone(&artifact));
    ctx.meshes_by_object.insert(obj.id, Rc::clone(&artifact));
    Ok(artifact)
}
