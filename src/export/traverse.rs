//! Scene traversal.
//!
//! One walk over the scene's top-level objects per sampled frame,
//! dispatching to a [`SceneVisitor`]. The geometry exporter and the
//! lighting checker are both visitors; the walk itself knows nothing
//! about what a visit does.

use super::instance::export_instance;
use super::mesh::export_mesh;
use super::ExportContext;
use crate::error::Result;
use crate::igmesh::MeshSerializer;
use crate::scene::{object_visible, ObjectKind, SceneObject, SceneSource};
use tracing::warn;

/// Per-object callbacks of one traversal pass.
pub trait SceneVisitor {
    fn handle_mesh(&mut self, scene: &dyn SceneSource, obj: &SceneObject) -> Result<()>;
    fn handle_lamp(&mut self, scene: &dyn SceneSource, obj: &SceneObject) -> Result<()>;
    fn handle_duplis(&mut self, scene: &dyn SceneSource, obj: &SceneObject) -> Result<()>;

    /// When true the walk stops early; checked before every object.
    fn can_abort(&self) -> bool {
        false
    }
}

/// Walk the scene's objects once, in scene order.
///
/// Duplicators are expanded through their dupli handler and never
/// exported directly; lamps and mesh-capable objects go through the
/// usual render-visibility check.
pub fn iterate_scene(scene: &dyn SceneSource, visitor: &mut dyn SceneVisitor) -> Result<()> {
    for obj in scene.objects() {
        if visitor.can_abort() {
            break;
        }
        if obj.is_duplicator {
            visitor.handle_duplis(scene, obj)?;
        } else if obj.kind == ObjectKind::Lamp {
            if object_visible(scene, obj, false) {
                visitor.handle_lamp(scene, obj)?;
            }
        } else if obj.kind.is_mesh_capable() && object_visible(scene, obj, false) {
            visitor.handle_mesh(scene, obj)?;
        }
    }
    Ok(())
}

/// True when the object's group layer restriction, if any, admits it.
pub(crate) fn group_layers_admit(obj: &SceneObject) -> bool {
    obj.group_layers.is_empty() || obj.group_layers.iter().any(|g| obj.layers.overlaps(*g))
}

/// The geometry pass: exports mesh artifacts, fans out materials,
/// accumulates instance keyframes and collects lamp fragments.
pub struct GeometryExporter<'a> {
    ctx: &'a mut ExportContext,
    serializer: &'a dyn MeshSerializer,
}

impl<'a> GeometryExporter<'a> {
    pub fn new(ctx: &'a mut ExportContext, serializer: &'a dyn MeshSerializer) -> Self {
        Self { ctx, serializer }
    }
}

impl SceneVisitor for GeometryExporter<'_> {
    fn handle_mesh(&mut self, scene: &dyn SceneSource, obj: &SceneObject) -> Result<()> {
        let artifact = export_mesh(self.ctx, scene, self.serializer, obj)?;
        export_instance(
            self.ctx,
            obj,
            &artifact,
            obj.matrix_world,
            scene.world_scale(),
            None,
        );
        Ok(())
    }

    fn handle_lamp(&mut self, _scene: &dyn SceneSource, obj: &SceneObject) -> Result<()> {
        if let Some(lamp) = &obj.lamp {
            let fragments = lamp.build(obj);
            if !fragments.is_empty() {
                self.ctx.lamps.add(obj.name.clone(), fragments);
            }
        }
        Ok(())
    }

    fn handle_duplis(&mut self, scene: &dyn SceneSource, obj: &SceneObject) -> Result<()> {
        // Expanded again on every sampled frame; revisited duplis hit
        // their existing instance records and accumulate keyframes.
        let duplis = match scene.create_dupli_list(obj) {
            Ok(duplis) => duplis,
            Err(err) => {
                // Soft failure: the rest of the scene still exports.
                warn!(object = %obj.name, "dupli expansion failed: {}", err);
                return Ok(());
            }
        };

        for dupli in &duplis {
            let Some(inner) = scene.object(dupli.object) else {
                continue;
            };
            if !inner.kind.is_mesh_capable() {
                continue;
            }
            if !object_visible(scene, inner, true) {
                continue;
            }
            if !group_layers_admit(inner) {
                continue;
            }
            let artifact = export_mesh(self.ctx, scene, self.serializer, inner)?;
            export_instance(
                self.ctx,
                inner,
                &artifact,
                dupli.matrix,
                scene.world_scale(),
                Some(dupli),
            );
        }
        Ok(())
    }
}
