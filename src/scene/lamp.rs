//! Lamp settings and background-material fragments.
//!
//! Sun and hemi lamps are exported as environment materials referenced by
//! the scene's background settings; all other lamp types contribute
//! nothing to the document.

use super::SceneObject;
use crate::document::DocNode;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Lamp data of a lamp-kind object, one case per host lamp subtype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LampSettings {
    Sun {
        turbidity: f64,
    },
    Hemi {
        env_map: Option<PathBuf>,
        gain: f64,
    },
    Area,
    Point,
    Spot,
}

impl LampSettings {
    /// Sun and hemi lamps unconditionally count as live emitters.
    pub fn is_background_emitter(&self) -> bool {
        matches!(self, LampSettings::Sun { .. } | LampSettings::Hemi { .. })
    }

    /// Build the lamp's material fragments, keyed by the object name.
    /// Returns an empty list for lamp types that are not exported.
    pub fn build(&self, obj: &SceneObject) -> Vec<DocNode> {
        match self {
            LampSettings::Sun { turbidity } => {
                // Sun direction is the lamp's local +Z axis in world space.
                let dir = obj.matrix_world.transform_vector3(Vec3::Z).normalize();
                vec![DocNode::new("material").field("name", obj.name.clone()).child(
                    DocNode::new("sunsky")
                        .field_list("sundir", [dir.x, dir.y, dir.z])
                        .field("turbidity", *turbidity),
                )]
            }
            LampSettings::Hemi { env_map, gain } => {
                let emission = match env_map {
                    Some(path) => DocNode::new("texture")
                        .field("path", path.display().to_string())
                        .field("gain", *gain),
                    None => DocNode::new("constant")
                        .child(DocNode::new("uniform").field("value", *gain)),
                };
                vec![DocNode::new("material").field("name", obj.name.clone()).child(
                    DocNode::new("diffuse")
                        .child(DocNode::new("base_emission").child(emission)),
                )]
            }
            LampSettings::Area | LampSettings::Point | LampSettings::Spot => Vec::new(),
        }
    }
}
