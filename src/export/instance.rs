//! Instance export and transform-track accumulation.
//!
//! An instance is one placement of a mesh artifact in the scene. The
//! first visit of an instance key creates its record; every later visit
//! (one per sampled frame) appends a `(time, matrix)` keyframe to an
//! Object-kind record. Section planes, sphere primitives and exit portals
//! are emitted once, from the first frame's transform only.

use super::mesh::ExportedMesh;
use super::transform::{keyframes, pos_field, rotation_field};
use super::ExportContext;
use crate::document::DocNode;
use crate::scene::{DupliInstance, ObjectId, ObjectKind, SceneObject};
use glam::Mat4;

/// Identity of one instance: the object, plus the generating particle
/// system and dupli persistent id when the instance is a dupli. Distinct
/// duplis of one object get distinct keys; the same dupli revisited on a
/// later frame maps back to its existing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceKey {
    pub object: ObjectId,
    pub particle_system: Option<u64>,
    pub persistent_id: Option<u64>,
}

impl InstanceKey {
    pub fn new(obj: &SceneObject, dupli: Option<&DupliInstance>) -> Self {
        match dupli {
            Some(d) => Self {
                object: obj.id,
                particle_system: d.particle_system,
                persistent_id: Some(d.persistent_id),
            },
            None => Self {
                object: obj.id,
                particle_system: None,
                persistent_id: None,
            },
        }
    }
}

/// Model-level extras captured from the object's materials when the
/// record is created.
#[derive(Debug, Clone, Default)]
pub struct ModelExtras {
    /// `(material name, profile path)` per emitting material with an IES
    /// profile.
    pub ies_profiles: Vec<(String, String)>,
    /// `(material name, measure, value)` per emitting material with an
    /// emission scale override.
    pub emission_scales: Vec<(String, String, f64)>,
    pub invisible_to_camera: bool,
    pub world_scale: f32,
}

impl ModelExtras {
    fn capture(obj: &SceneObject, world_scale: f32) -> Self {
        let mut extras = ModelExtras {
            invisible_to_camera: obj.mesh.invisible_to_camera,
            world_scale,
            ..Default::default()
        };
        for material in obj.materials() {
            if let Some(emission) = material.emission() {
                if !emission.enabled {
                    continue;
                }
                if let Some(path) = &emission.ies_path {
                    extras
                        .ies_profiles
                        .push((material.name().to_string(), path.display().to_string()));
                }
                if let Some(scale) = &emission.scale {
                    extras.emission_scales.push((
                        material.name().to_string(),
                        scale.measure.clone(),
                        scale.scaled_value(),
                    ));
                }
            }
        }
        extras
    }
}

/// One exported instance. Object-kind records grow a keyframe per sampled
/// frame; every other kind is immutable once created.
#[derive(Debug, Clone)]
pub enum InstanceRecord {
    Object {
        mesh_name: String,
        /// Ordered `(normalised time, world matrix)` samples; the first
        /// one doubles as the canonical rest transform.
        samples: Vec<(f64, Mat4)>,
        extras: ModelExtras,
    },
    SectionPlane(DocNode),
    Sphere(DocNode),
    Portal(DocNode),
}

/// Export one resolved `(object, world matrix)` pair at the context's
/// current sample time.
pub fn export_instance(
    ctx: &mut ExportContext,
    obj: &SceneObject,
    artifact: &ExportedMesh,
    matrix: Mat4,
    world_scale: f32,
    dupli: Option<&DupliInstance>,
) {
    let key = InstanceKey::new(obj, dupli);

    // Repeat visit: extend the transform track. Special-case records
    // ignore later frames entirely.
    if let Some(record) = ctx.objects.get_mut(&key) {
        if let InstanceRecord::Object { samples, .. } = record {
            samples.push((ctx.normalised_time, matrix));
        }
        return;
    }

    let record = if obj.mesh.section_plane {
        InstanceRecord::SectionPlane(section_plane_fragment(obj, &matrix))
    } else if obj.mesh.sphere_primitive {
        InstanceRecord::Sphere(sphere_fragment(obj, &matrix))
    } else if obj.mesh.exit_portal && obj.kind == ObjectKind::Mesh {
        // The portal flag is honored for mesh objects only; converted
        // kinds (curve, surface, font) export as ordinary models.
        InstanceRecord::Portal(portal_fragment(&artifact.name, &matrix, world_scale))
    } else {
        InstanceRecord::Object {
            mesh_name: artifact.name.clone(),
            samples: vec![(ctx.normalised_time, matrix)],
            extras: ModelExtras::capture(obj, world_scale),
        }
    };

    ctx.objects.add(key, record);
    ctx.instance_count += 1;
}

/// Build a `section_plane` element from the matrix translation and its
/// third axis.
fn section_plane_fragment(obj: &SceneObject, matrix: &Mat4) -> DocNode {
    let point = matrix.w_axis;
    let normal = matrix.z_axis;
    DocNode::new("section_plane")
        .field_list("point", [point.x, point.y, point.z])
        .field_list("normal", [normal.x, normal.y, normal.z])
        .field("cull_geometry", obj.mesh.cull_geometry)
}

/// Build a `sphere` element. The radius is the object-space bounding
/// radius scaled by the largest absolute component of the matrix's scale
/// vector; the material is the last assigned slot (host quirk, preserved).
fn sphere_fragment(obj: &SceneObject, matrix: &Mat4) -> DocNode {
    let mut material_name = String::new();
    for material in obj.materials() {
        material_name = material.name().to_string();
    }

    let (scale, _, _) = matrix.to_scale_rotation_translation();
    let max_scale = scale.x.abs().max(scale.y.abs()).max(scale.z.abs());
    let radius_ws = obj.bound_box.sphere_radius() * max_scale;

    let center = matrix.w_axis;
    DocNode::new("sphere")
        .field_list("center", [center.x, center.y, center.z])
        .field("radius", radius_ws)
        .field("material_name", material_name)
}

/// Build an `exit_portal` element from a single matrix; portals are never
/// keyframed.
fn portal_fragment(mesh_name: &str, matrix: &Mat4, world_scale: f32) -> DocNode {
    DocNode::new("exit_portal")
        .field("mesh_name", mesh_name.to_string())
        .field("scale", 1.0)
        .child(rotation_field(matrix))
        .child(pos_field(matrix, world_scale))
}

/// Build the final document fragment of a record.
///
/// Object-kind records become `model` elements: a base rotation from the
/// first sample, a `pos` when static, and a keyframe track when more than
/// one sample accumulated (keyframes carry the positions then).
pub fn build_instance_fragment(record: &InstanceRecord) -> DocNode {
    match record {
        InstanceRecord::Object {
            mesh_name,
            samples,
            extras,
        } => {
            let (_, first) = samples[0];
            let mut node = DocNode::new("model")
                .field("mesh_name", mesh_name.clone())
                // scale data lives in the rotation matrix
                .field("scale", 1.0)
                .child(rotation_field(&first));

            if samples.len() > 1 {
                node = node.extend(keyframes(samples, extras.world_scale));
            } else {
                node = node.child(pos_field(&first, extras.world_scale));
            }

            for (material_name, path) in &extras.ies_profiles {
                node = node.child(
                    DocNode::new("ies_profile")
                        .field("material_name", material_name.clone())
                        .field("path", path.clone()),
                );
            }
            for (material_name, measure, value) in &extras.emission_scales {
                node = node.child(
                    DocNode::new("emission_scale")
                        .field("material_name", material_name.clone())
                        .field("measure", measure.clone())
                        .field("value", *value),
                );
            }
            if extras.invisible_to_camera {
                node = node.field("invisible_to_camera", true);
            }
            node
        }
        InstanceRecord::SectionPlane(node)
        | InstanceRecord::Sphere(node)
        | InstanceRecord::Portal(node) => node.clone(),
    }
}
