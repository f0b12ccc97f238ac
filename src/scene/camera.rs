//! Camera and tonemapping settings.

use crate::document::DocNode;
use glam::Mat4;
use serde::{Deserialize, Serialize};

/// Tonemapping operator, one case per host subtype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Tonemapping {
    Reinhard {
        pre_scale: f64,
        post_scale: f64,
        burn: f64,
    },
    Linear {
        scale: f64,
    },
}

impl Default for Tonemapping {
    fn default() -> Self {
        Tonemapping::Reinhard {
            pre_scale: 1.0,
            post_scale: 1.0,
            burn: 6.0,
        }
    }
}

impl Tonemapping {
    pub fn build(&self) -> DocNode {
        let inner = match self {
            Tonemapping::Reinhard {
                pre_scale,
                post_scale,
                burn,
            } => DocNode::new("reinhard")
                .field("pre_scale", *pre_scale)
                .field("post_scale", *post_scale)
                .field("burn", *burn),
            Tonemapping::Linear { scale } => DocNode::new("linear").field("scale", *scale),
        };
        DocNode::new("tonemapping").child(inner)
    }
}

/// Camera property bag read by the exporter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraSettings {
    /// Reciprocal shutter duration; an exposure of 125 means 1/125 s.
    pub exposure: f64,
    pub aperture_radius: f64,
    pub focus_distance: f64,
    pub sensor_width: f64,
    pub lens_sensor_dist: f64,
    pub autofocus: bool,
    pub tonemapping: Tonemapping,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            exposure: 125.0,
            aperture_radius: 0.001,
            focus_distance: 3.0,
            sensor_width: 0.036,
            lens_sensor_dist: 0.02,
            autofocus: false,
            tonemapping: Tonemapping::default(),
        }
    }
}

impl CameraSettings {
    /// Shutter-open duration in seconds.
    pub fn exposure_duration(&self) -> f64 {
        1.0 / self.exposure
    }
}

/// The scene camera: settings plus the frame-dependent world matrix.
#[derive(Debug, Clone)]
pub struct Camera {
    pub matrix_world: Mat4,
    pub settings: CameraSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exposure_duration() {
        let settings = CameraSettings {
            exposure: 50.0,
            ..CameraSettings::default()
        };
        assert_eq!(settings.exposure_duration(), 0.02);
    }

    #[test]
    fn test_tonemapping_fragments() {
        let node = Tonemapping::default().build();
        assert_eq!(node.name(), "tonemapping");
        let reinhard = node.find("reinhard").unwrap();
        assert_eq!(reinhard.find("burn").unwrap().text(), "6");

        let node = Tonemapping::Linear { scale: 0.5 }.build();
        assert_eq!(node.find("linear").unwrap().find("scale").unwrap().text(), "0.5");
    }
}
