//! Lighting validity pre-pass.
//!
//! Before any geometry is exported the scene is walked once to decide
//! whether anything in it can illuminate the render: a background lamp,
//! or a visible object carrying a material with a live emission. When
//! nothing qualifies the orchestrator falls back to a constant white
//! background so the render is never black.

use super::traverse::{group_layers_admit, SceneVisitor};
use crate::error::Result;
use crate::scene::{object_visible, Emission, ObjectId, SceneObject, SceneSource};
use std::collections::HashSet;
use tracing::debug;

/// True when the emission settings would contribute light, taking the
/// scene's light layer gains into account.
fn emission_live(scene: &dyn SceneSource, emission: &Emission) -> bool {
    if !emission.enabled {
        return false;
    }
    if !emission.spectrum.is_positive() {
        return false;
    }
    let magnitude_ok = match &emission.scale {
        Some(scale) => scale.value > 0.0,
        None => emission.power > 0.0 && emission.gain > 0.0,
    };
    if !magnitude_ok {
        return false;
    }
    let layers = scene.light_layers();
    layers.is_enabled(&emission.layer) && layers.gain_for_layer(&emission.layer) > 0.0
}

/// Visitor that scans for at least one light source and aborts the walk
/// as soon as it finds one.
pub struct LightingChecker {
    objects_checked: HashSet<ObjectId>,
    materials_checked: HashSet<String>,
    duplis_checked: HashSet<ObjectId>,
    valid: bool,
}

impl LightingChecker {
    pub fn new() -> Self {
        Self {
            objects_checked: HashSet::new(),
            materials_checked: HashSet::new(),
            duplis_checked: HashSet::new(),
            valid: false,
        }
    }

    /// Whether any light source was found so far.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    fn check_object_materials(&mut self, scene: &dyn SceneSource, obj: &SceneObject) {
        if !self.objects_checked.insert(obj.id) {
            return;
        }
        for material in obj.materials() {
            if !self.materials_checked.insert(material.name().to_string()) {
                continue;
            }
            if let Some(emission) = material.emission() {
                if emission_live(scene, emission) {
                    debug!(material = material.name(), "found emitting material");
                    self.valid = true;
                    return;
                }
            }
        }
    }
}

impl Default for LightingChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneVisitor for LightingChecker {
    fn handle_mesh(&mut self, scene: &dyn SceneSource, obj: &SceneObject) -> Result<()> {
        self.check_object_materials(scene, obj);
        Ok(())
    }

    fn handle_lamp(&mut self, _scene: &dyn SceneSource, obj: &SceneObject) -> Result<()> {
        // Only background lamp kinds produce exportable light.
        if let Some(lamp) = &obj.lamp {
            if lamp.is_background_emitter() {
                debug!(lamp = %obj.name, "found background lamp");
                self.valid = true;
            }
        }
        Ok(())
    }

    fn handle_duplis(&mut self, scene: &dyn SceneSource, obj: &SceneObject) -> Result<()> {
        if !self.duplis_checked.insert(obj.id) {
            return Ok(());
        }
        let Ok(duplis) = scene.create_dupli_list(obj) else {
            return Ok(());
        };
        for dupli in &duplis {
            if self.valid {
                break;
            }
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
            self.check_object_materials(scene, inner);
        }
        Ok(())
    }

    fn can_abort(&self) -> bool {
        self.valid
    }
}
