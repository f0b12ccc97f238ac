//! Material abstraction and light layers.
//!
//! The material settings schema belongs to the host; the exporter only
//! needs a name, the emission facts the lighting checker reads, and a
//! `build` capability producing the material's document fragments.

use super::Spectrum;
use crate::document::DocNode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Emission scale override: emit a fixed measure instead of power/gain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionScale {
    /// Measure unit, e.g. "luminous_flux" or "luminance".
    pub measure: String,
    pub value: f64,
    pub exp: i32,
}

impl EmissionScale {
    pub fn scaled_value(&self) -> f64 {
        self.value * 10f64.powi(self.exp)
    }
}

/// Emission settings of one material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emission {
    pub enabled: bool,
    pub spectrum: Spectrum,
    /// Light layer this emitter contributes to.
    pub layer: String,
    pub power: f64,
    pub gain: f64,
    pub scale: Option<EmissionScale>,
    /// IES illumination profile applied at the model level.
    pub ies_path: Option<PathBuf>,
}

/// Host material viewed as an opaque attribute bag with a build capability.
///
/// `build` may return more than one fragment (e.g. medium-linked
/// sub-elements); the whole list is cached under the material name.
pub trait SceneMaterial: fmt::Debug {
    fn name(&self) -> &str;

    fn emission(&self) -> Option<&Emission> {
        None
    }

    fn build(&self) -> Vec<DocNode>;
}

/// The default clay material, always present in the exported document so
/// objects with no material assignment still render.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClayMaterial;

impl SceneMaterial for ClayMaterial {
    fn name(&self) -> &str {
        "clay"
    }

    fn build(&self) -> Vec<DocNode> {
        vec![DocNode::new("material").field("name", "clay").child(
            DocNode::new("diffuse").child(
                DocNode::new("albedo").child(
                    DocNode::new("constant").child(
                        DocNode::new("rgb")
                            .field_list("rgb", [0.8, 0.8, 0.8])
                            .field("gamma", 2.2),
                    ),
                ),
            ),
        )]
    }
}

/// The default null material, always present in the exported document.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullMaterial;

impl SceneMaterial for NullMaterial {
    fn name(&self) -> &str {
        "null"
    }

    fn build(&self) -> Vec<DocNode> {
        vec![DocNode::new("material")
            .field("name", "null")
            .child(DocNode::new("null_material"))]
    }
}

/// One named, independently gain-controlled emitter grouping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightLayer {
    pub name: String,
    pub enabled: bool,
    pub gain: f64,
}

/// Ordered light layer list; indices are assignment order.
///
/// Emitters referencing an unknown layer fall back to the implicit default
/// layer, which is always enabled with gain 1.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LightLayers {
    layers: Vec<LightLayer>,
}

impl LightLayers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: impl Into<String>, enabled: bool, gain: f64) {
        self.layers.push(LightLayer {
            name: name.into(),
            enabled,
            gain,
        });
    }

    /// Stable (index, layer) enumeration in assignment order.
    pub fn enumerate(&self) -> impl Iterator<Item = (usize, &LightLayer)> {
        self.layers.iter().enumerate()
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.layers
            .iter()
            .find(|l| l.name == name)
            .map(|l| l.enabled)
            .unwrap_or(true)
    }

    pub fn gain_for_layer(&self, name: &str) -> f64 {
        self.layers
            .iter()
            .find(|l| l.name == name)
            .map(|l| l.gain)
            .unwrap_or(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emission_scale_value() {
        let scale = EmissionScale {
            measure: "luminance".to_string(),
            value: 2.0,
            exp: 3,
        };
        assert_eq!(scale.scaled_value(), 2000.0);
    }

    #[test]
    fn test_default_materials_build() {
        let clay = ClayMaterial.build();
        assert_eq!(clay.len(), 1);
        assert_eq!(clay[0].find("name").unwrap().text(), "clay");
        assert!(clay[0].find("diffuse").is_some());

        let null = NullMaterial.build();
        assert_eq!(null[0].find("name").unwrap().text(), "null");
        assert!(null[0].find("null_material").is_some());
    }

    #[test]
    fn test_light_layer_lookup() {
        let mut layers = LightLayers::new();
        layers.add("key", true, 2.0);
        layers.add("fill", false, 0.5);

        assert!(layers.is_enabled("key"));
        assert!(!layers.is_enabled("fill"));
        assert_eq!(layers.gain_for_layer("key"), 2.0);

        // unknown layer falls back to the implicit default
        assert!(layers.is_enabled("missing"));
        assert_eq!(layers.gain_for_layer("missing"), 1.0);

        let indices: Vec<_> = layers.enumerate().map(|(i, l)| (i, l.name.clone())).collect();
        assert_eq!(indices, vec![(0, "key".to_string()), (1, "fill".to_string())]);
    }
}
