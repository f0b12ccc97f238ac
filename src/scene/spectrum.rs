//! Spectrum settings shared by emission and medium properties.

use crate::document::DocNode;
use serde::{Deserialize, Serialize};

/// A spectral power distribution, one case per host subtype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Spectrum {
    Uniform { value: f64 },
    Rgb { rgb: [f64; 3], gain: f64 },
    Blackbody { temperature: f64, gain: f64 },
}

impl Spectrum {
    /// Whether the spectrum emits any energy at all. Used by the lighting
    /// validity checker.
    pub fn is_positive(&self) -> bool {
        match self {
            Spectrum::Uniform { value } => *value > 0.0,
            Spectrum::Rgb { rgb, gain: _ } => rgb.iter().sum::<f64>() > 0.0,
            Spectrum::Blackbody { gain, .. } => *gain > 0.0,
        }
    }

    /// Build the spectrum element (`rgb`, `uniform` or `blackbody`).
    pub fn build(&self) -> DocNode {
        match self {
            Spectrum::Uniform { value } => DocNode::new("uniform").field("value", *value),
            Spectrum::Rgb { rgb, gain } => DocNode::new("rgb")
                .field_list("rgb", rgb.iter().map(|c| c * gain))
                .field("gamma", 1),
            Spectrum::Blackbody { temperature, gain } => DocNode::new("blackbody")
                .field("temperature", *temperature)
                .field("gain", *gain),
        }
    }

    /// Build the spectrum wrapped in a `constant` element, the form most
    /// material and medium parameters take.
    pub fn build_constant(&self) -> DocNode {
        DocNode::new("constant").child(self.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positivity() {
        assert!(Spectrum::Uniform { value: 0.5 }.is_positive());
        assert!(!Spectrum::Uniform { value: 0.0 }.is_positive());
        assert!(Spectrum::Rgb { rgb: [0.0, 0.1, 0.0], gain: 1.0 }.is_positive());
        assert!(!Spectrum::Rgb { rgb: [0.0, 0.0, 0.0], gain: 1.0 }.is_positive());
        assert!(Spectrum::Blackbody { temperature: 6500.0, gain: 1.0 }.is_positive());
        assert!(!Spectrum::Blackbody { temperature: 6500.0, gain: 0.0 }.is_positive());
    }

    #[test]
    fn test_rgb_gain_applied() {
        let node = Spectrum::Rgb { rgb: [1.0, 0.5, 0.25], gain: 2.0 }.build();
        assert_eq!(node.find("rgb").unwrap().text(), "2 1 0.5");
        assert_eq!(node.find("gamma").unwrap().text(), "1");
    }

    #[test]
    fn test_constant_wrapping() {
        let node = Spectrum::Uniform { value: 3.0 }.build_constant();
        assert_eq!(node.name(), "constant");
        assert_eq!(node.find("uniform").unwrap().find("value").unwrap().text(), "3");
    }
}
