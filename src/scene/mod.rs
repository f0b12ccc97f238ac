//! Host scene abstraction.
//!
//! The exporter runs embedded in a content-creation application and never
//! owns the scene graph. The host exposes one scene per export run through
//! the [`SceneSource`] trait; objects, evaluated meshes and dupli lists are
//! borrowed views or transient snapshots of host data.

mod camera;
mod lamp;
mod material;
mod medium;
mod settings;
mod spectrum;

pub use camera::{Camera, CameraSettings, Tonemapping};
pub use lamp::LampSettings;
pub use material::{
    ClayMaterial, Emission, EmissionScale, LightLayer, LightLayers, NullMaterial, SceneMaterial,
};
pub use medium::{Medium, NamedMedium, PhaseFunction, Sss};
pub use settings::RenderSettings;
pub use spectrum::Spectrum;

use crate::error::Result;
use glam::{Mat4, Vec3};
use std::path::PathBuf;
use std::sync::Arc;

/// Stable per-run handle for a host object.
///
/// Host object references are reference-identity keyed; the adapter assigns
/// each host object one `ObjectId` at first sight and keeps the mapping
/// alive for the whole export run, so the exporter never hashes raw host
/// pointers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

/// Host object type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Mesh,
    Curve,
    Surface,
    Font,
    Lamp,
    Camera,
    Empty,
    Other,
}

impl ObjectKind {
    /// Types that can be evaluated to a mesh and exported as geometry.
    pub fn is_mesh_capable(&self) -> bool {
        matches!(
            self,
            ObjectKind::Mesh | ObjectKind::Curve | ObjectKind::Surface | ObjectKind::Font
        )
    }
}

/// A 20-bit style scene layer bitmask, as used by the host for object and
/// group visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    pub fn overlaps(&self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }
}

/// Per-object mesh export settings from the host property system.
#[derive(Debug, Clone, Default)]
pub struct MeshSettings {
    /// Export this object as a section plane instead of geometry.
    pub section_plane: bool,
    /// Cull geometry on the positive side of the section plane.
    pub cull_geometry: bool,
    /// Export this object as an analytic sphere primitive.
    pub sphere_primitive: bool,
    /// Export this object as an exit portal.
    pub exit_portal: bool,
    /// Hide the object from camera rays.
    pub invisible_to_camera: bool,
    /// Pre-serialized external mesh file standing in for this object's
    /// geometry; when valid, the exporter never writes the mesh itself.
    pub proxy_path: Option<PathBuf>,
}

impl MeshSettings {
    pub fn valid_proxy(&self) -> bool {
        self.proxy_path
            .as_ref()
            .map(|p| !p.as_os_str().is_empty())
            .unwrap_or(false)
    }
}

/// Object-space axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Half the maximum extent across the three axes; the radius used for
    /// sphere-primitive export.
    pub fn sphere_radius(&self) -> f32 {
        let d = self.max - self.min;
        d.x.max(d.y).max(d.z) * 0.5
    }
}

/// One object in the host scene graph.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    pub kind: ObjectKind,
    pub matrix_world: Mat4,
    /// Material slots in host slot order; empty slots stay in place.
    pub material_slots: Vec<Option<Arc<dyn SceneMaterial>>>,
    pub mesh: MeshSettings,
    pub bound_box: BoundBox,
    pub hide_render: bool,
    pub layers: LayerMask,
    /// Enabled-layer mask of every group this object belongs to.
    pub group_layers: Vec<LayerMask>,
    pub lamp: Option<LampSettings>,
    /// Object generates duplis (group instancing or particle systems).
    pub is_duplicator: bool,
}

impl SceneObject {
    /// Iterate the materials assigned to non-empty slots, in slot order.
    pub fn materials(&self) -> impl Iterator<Item = &Arc<dyn SceneMaterial>> {
        self.material_slots.iter().flatten()
    }
}

/// One procedurally generated instance produced by dupli expansion.
#[derive(Debug, Clone)]
pub struct DupliInstance {
    /// The underlying duplicated object.
    pub object: ObjectId,
    pub matrix: Mat4,
    /// Host-assigned persistent id distinguishing duplis of the same
    /// object from each other, stable across frames.
    pub persistent_id: u64,
    /// Generating particle system, if particle-driven.
    pub particle_system: Option<u64>,
}

/// A face of an evaluated mesh, carrying the facts the exporter reads
/// without touching vertex topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshFace {
    pub material_index: usize,
    pub use_smooth: bool,
}

/// Transient modifier-applied mesh snapshot. Host-owned data copied into
/// an owned value; dropping it releases the snapshot on every exit path.
#[derive(Debug, Clone, Default)]
pub struct MeshSnapshot {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<MeshFace>,
}

/// Borrowed per-run view of one host scene.
pub trait SceneSource {
    fn name(&self) -> &str;

    /// Top-level objects in host enumeration order.
    fn objects(&self) -> &[SceneObject];

    /// Look up an object by handle (dupli expansion yields handles).
    fn object(&self, id: ObjectId) -> Option<&SceneObject>;

    /// Evaluate the object's mesh with modifiers applied.
    ///
    /// Only valid for mesh-capable object kinds; the host may fail for
    /// unsupported arrangements.
    fn evaluate_mesh(&self, obj: &SceneObject) -> Result<MeshSnapshot>;

    /// Expand the dupli list of a generating object.
    fn create_dupli_list(&self, obj: &SceneObject) -> Result<Vec<DupliInstance>>;

    /// Move host playback to the given frame; object and camera matrices
    /// returned afterwards reflect that frame.
    fn set_frame(&mut self, frame: i32);

    fn render(&self) -> &RenderSettings;

    fn camera(&self) -> Option<&Camera>;

    fn light_layers(&self) -> &LightLayers;

    fn mediums(&self) -> &[NamedMedium];

    /// Layers currently enabled for rendering.
    fn visible_layers(&self) -> LayerMask;

    /// Scene unit scale applied to all exported positions.
    fn world_scale(&self) -> f32 {
        1.0
    }
}

/// Render-visibility predicate combining the host's per-object hide flag
/// with scene layer masks. Duplis bypass the layer check; their own
/// group-layer gating happens during dupli expansion.
pub fn object_visible(scene: &dyn SceneSource, obj: &SceneObject, is_dupli: bool) -> bool {
    if obj.hide_render {
        return false;
    }
    is_dupli || obj.layers.overlaps(scene.visible_layers())
}
