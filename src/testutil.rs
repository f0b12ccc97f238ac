//! Shared test fixtures: canned objects, materials and an in-memory
//! [`SceneSource`] implementation.

use crate::document::DocNode;
use crate::error::{ExportError, Result};
use crate::scene::{
    BoundBox, Camera, CameraSettings, DupliInstance, Emission, LampSettings, LayerMask,
    LightLayers, MeshFace, MeshSettings, MeshSnapshot, NamedMedium, ObjectId, ObjectKind,
    RenderSettings, SceneMaterial, SceneObject, SceneSource,
};
use glam::{Mat4, Vec3};
use std::collections::HashMap;
use std::sync::Arc;

/// A mesh-kind object with a unit-cube bound box and no materials.
pub fn mesh_object(id: u64, name: &str, matrix: Mat4) -> SceneObject {
    SceneObject {
        id: ObjectId(id),
        name: name.to_string(),
        kind: ObjectKind::Mesh,
        matrix_world: matrix,
        material_slots: Vec::new(),
        mesh: MeshSettings::default(),
        bound_box: BoundBox::new(Vec3::splat(-0.5), Vec3::splat(0.5)),
        hide_render: false,
        layers: LayerMask(1),
        group_layers: Vec::new(),
        lamp: None,
        is_duplicator: false,
    }
}

/// A lamp-kind object carrying the given lamp settings.
pub fn lamp_object(id: u64, name: &str, lamp: LampSettings) -> SceneObject {
    SceneObject {
        kind: ObjectKind::Lamp,
        lamp: Some(lamp),
        ..mesh_object(id, name, Mat4::IDENTITY)
    }
}

#[derive(Debug)]
struct StubMaterial {
    name: String,
    emission: Option<Emission>,
}

impl SceneMaterial for StubMaterial {
    fn name(&self) -> &str {
        &self.name
    }

    fn emission(&self) -> Option<&Emission> {
        self.emission.as_ref()
    }

    fn build(&self) -> Vec<DocNode> {
        vec![DocNode::new("material")
            .field("name", self.name.clone())
            .child(DocNode::new("diffuse"))]
    }
}

/// A non-emitting stub material.
pub fn test_material(name: &str) -> Arc<dyn SceneMaterial> {
    Arc::new(StubMaterial {
        name: name.to_string(),
        emission: None,
    })
}

/// A stub material with the given emission settings.
pub fn emitting_material(name: &str, emission: Emission) -> Arc<dyn SceneMaterial> {
    Arc::new(StubMaterial {
        name: name.to_string(),
        emission: Some(emission),
    })
}

/// A unit cube; every face references material slot 0, flat-shaded.
pub fn cube_mesh() -> MeshSnapshot {
    let mut vertices = Vec::with_capacity(8);
    for z in [-0.5f32, 0.5] {
        for y in [-0.5f32, 0.5] {
            for x in [-0.5f32, 0.5] {
                vertices.push(Vec3::new(x, y, z));
            }
        }
    }
    MeshSnapshot {
        vertices,
        faces: vec![
            MeshFace {
                material_index: 0,
                use_smooth: false,
            };
            6
        ],
    }
}

/// In-memory scene with registered meshes, dupli lists and per-object
/// animation velocities driving `set_frame`.
pub struct TestScene {
    name: String,
    objects: Vec<SceneObject>,
    meshes: HashMap<ObjectId, MeshSnapshot>,
    duplis: HashMap<ObjectId, Vec<DupliInstance>>,
    velocities: HashMap<ObjectId, Vec3>,
    base_matrices: HashMap<ObjectId, Mat4>,
    render: RenderSettings,
    camera: Option<Camera>,
    light_layers: LightLayers,
    mediums: Vec<NamedMedium>,
    visible_layers: LayerMask,
    frame: i32,
}

impl TestScene {
    pub fn new(name: &str) -> Self {
        let render = RenderSettings::default();
        let frame = render.frame_current;
        Self {
            name: name.to_string(),
            objects: Vec::new(),
            meshes: HashMap::new(),
            duplis: HashMap::new(),
            velocities: HashMap::new(),
            base_matrices: HashMap::new(),
            render,
            camera: Some(Camera {
                matrix_world: Mat4::IDENTITY,
                settings: CameraSettings::default(),
            }),
            light_layers: LightLayers::new(),
            mediums: Vec::new(),
            visible_layers: LayerMask::ALL,
            frame,
        }
    }

    pub fn with_object(mut self, obj: SceneObject, mesh: MeshSnapshot) -> Self {
        self.base_matrices.insert(obj.id, obj.matrix_world);
        self.meshes.insert(obj.id, mesh);
        self.objects.push(obj);
        self
    }

    pub fn with_duplis(mut self, generator: ObjectId, duplis: Vec<DupliInstance>) -> Self {
        self.duplis.insert(generator, duplis);
        self
    }

    pub fn with_velocity(mut self, id: ObjectId, velocity: Vec3) -> Self {
        self.velocities.insert(id, velocity);
        self
    }

    pub fn with_render(mut self, render: RenderSettings) -> Self {
        self.frame = render.frame_current;
        self.render = render;
        self
    }

    pub fn with_camera_settings(mut self, settings: CameraSettings) -> Self {
        self.camera = Some(Camera {
            matrix_world: Mat4::IDENTITY,
            settings,
        });
        self
    }

    pub fn without_camera(mut self) -> Self {
        self.camera = None;
        self
    }

    pub fn with_light_layers(mut self, layers: LightLayers) -> Self {
        self.light_layers = layers;
        self
    }

    pub fn with_medium(mut self, medium: NamedMedium) -> Self {
        self.mediums.push(medium);
        self
    }

    pub fn with_visible_layers(mut self, layers: LayerMask) -> Self {
        self.visible_layers = layers;
        self
    }

    pub fn current_frame(&self) -> i32 {
        self.frame
    }
}

impl SceneSource for TestScene {
    fn name(&self) -> &str {
        &self.name
    }

    fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    fn evaluate_mesh(&self, obj: &SceneObject) -> Result<MeshSnapshot> {
        self.meshes.get(&obj.id).cloned().ok_or_else(|| {
            ExportError::MeshEvaluation(obj.name.clone(), "no mesh registered".to_string())
        })
    }

    fn create_dupli_list(&self, obj: &SceneObject) -> Result<Vec<DupliInstance>> {
        self.duplis.get(&obj.id).cloned().ok_or_else(|| {
            ExportError::DupliExpansion(obj.name.clone(), "no dupli list registered".to_string())
        })
    }

    fn set_frame(&mut self, frame: i32) {
        self.frame = frame;
        let offset = (frame - self.render.frame_current) as f32;
        for obj in &mut self.objects {
            if let Some(velocity) = self.velocities.get(&obj.id) {
                let base = self.base_matrices[&obj.id];
                obj.matrix_world = Mat4::from_translation(*velocity * offset) * base;
            }
        }
    }

    fn render(&self) -> &RenderSettings {
        &self.render
    }

    fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    fn light_layers(&self) -> &LightLayers {
        &self.light_layers
    }

    fn mediums(&self) -> &[NamedMedium] {
        &self.mediums
    }

    fn visible_layers(&self) -> LayerMask {
        self.visible_layers
    }
}
