//! Participating medium settings.
//!
//! Mediums are named per scene and numbered into renderer uids starting at
//! 10. A default `basic` medium is always appended after the scene's own
//! mediums so specular materials without an explicit medium still resolve.

use super::Spectrum;
use crate::document::DocNode;
use serde::{Deserialize, Serialize};

/// Phase function of a subsurface-scattering medium.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PhaseFunction {
    Uniform,
    HenyeyGreenstein { g: Spectrum },
}

impl PhaseFunction {
    fn build(&self) -> DocNode {
        match self {
            PhaseFunction::Uniform => DocNode::new("phase_function").child(DocNode::new("uniform")),
            PhaseFunction::HenyeyGreenstein { g } => DocNode::new("phase_function").child(
                DocNode::new("henyey_greenstein")
                    .child(DocNode::new("g_spectrum").child(g.build_constant())),
            ),
        }
    }
}

/// Subsurface scattering settings of a basic medium.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sss {
    pub scatter: Spectrum,
    pub phase: PhaseFunction,
}

/// Medium settings, one case per host medium subtype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Medium {
    Basic {
        ior: f64,
        cauchy_b: f64,
        max_extinction: f64,
        /// Absorption colour; RGB values are inverted (`1 - c`) when the
        /// coefficient spectrum is built, so white means no absorption.
        absorption: Spectrum,
        sss: Option<Sss>,
    },
    Dermis {
        hemoglobin_fraction: f64,
    },
    Epidermis {
        melanin_fraction: f64,
        melanin_type_blend: f64,
    },
}

/// A named medium with its renderer precedence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedMedium {
    pub name: String,
    pub precedence: i32,
    pub medium: Medium,
}

/// Renderer medium uids start at 10.
const MEDIUM_UID_BASE: usize = 10;

impl NamedMedium {
    /// Build the `medium` element. `index` is the medium's position in the
    /// scene's medium list.
    pub fn build(&self, index: usize) -> DocNode {
        let mut node = DocNode::new("medium")
            .field("name", format!("{}_medium", self.name))
            .field("uid", index + MEDIUM_UID_BASE)
            .field("precedence", self.precedence);

        let body = match &self.medium {
            Medium::Basic {
                ior,
                cauchy_b,
                max_extinction,
                absorption,
                sss,
            } => {
                let coeff = match absorption {
                    Spectrum::Rgb { rgb, gain } => Spectrum::Rgb {
                        rgb: [
                            (1.0 - rgb[0]) * gain,
                            (1.0 - rgb[1]) * gain,
                            (1.0 - rgb[2]) * gain,
                        ],
                        gain: 1.0,
                    },
                    other => other.clone(),
                };
                let mut basic = DocNode::new("basic")
                    .field("ior", *ior)
                    .field("cauchy_b_coeff", *cauchy_b)
                    .field("max_extinction_coeff", *max_extinction)
                    .child(DocNode::new("absorption_coefficient").child(coeff.build_constant()));
                if let Some(sss) = sss {
                    basic = basic.child(
                        DocNode::new("subsurface_scattering")
                            .child(
                                DocNode::new("scattering_coefficient_spectrum")
                                    .child(sss.scatter.build_constant()),
                            )
                            .child(sss.phase.build()),
                    );
                }
                basic
            }
            Medium::Dermis { hemoglobin_fraction } => {
                DocNode::new("dermis").field("hemoglobin_fraction", *hemoglobin_fraction)
            }
            Medium::Epidermis {
                melanin_fraction,
                melanin_type_blend,
            } => DocNode::new("epidermis")
                .field("melanin_fraction", *melanin_fraction)
                .field("melanin_type_blend", *melanin_type_blend),
        };

        node.push(body);
        node
    }

    /// The default `basic` medium appended after `count` scene mediums.
    pub fn default_basic(count: usize) -> DocNode {
        DocNode::new("medium")
            .field("name", "basic")
            .field("uid", count + MEDIUM_UID_BASE)
            .field("precedence", 10)
            .child(
                DocNode::new("basic")
                    .field("ior", 1.5)
                    .field("cauchy_b_coeff", 0)
                    .field("max_extinction_coeff", 1)
                    .child(
                        DocNode::new("absorption_coefficient").child(
                            DocNode::new("constant")
                                .child(DocNode::new("uniform").field("value", 0)),
                        ),
                    ),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_medium_fragment() {
        let medium = NamedMedium {
            name: "glass".to_string(),
            precedence: 2,
            medium: Medium::Basic {
                ior: 1.5,
                cauchy_b: 0.0,
                max_extinction: 1.0,
                absorption: Spectrum::Rgb { rgb: [1.0, 1.0, 0.5], gain: 2.0 },
                sss: None,
            },
        };
        let node = medium.build(0);
        assert_eq!(node.find("name").unwrap().text(), "glass_medium");
        assert_eq!(node.find("uid").unwrap().text(), "10");
        assert_eq!(node.find("precedence").unwrap().text(), "2");

        // rgb absorption is inverted and gain-scaled
        let rgb = node
            .find("basic")
            .unwrap()
            .find("absorption_coefficient")
            .unwrap()
            .find("constant")
            .unwrap()
            .find("rgb")
            .unwrap();
        assert_eq!(rgb.find("rgb").unwrap().text(), "0 0 1");
    }

    #[test]
    fn test_sss_fragment() {
        let medium = NamedMedium {
            name: "skin".to_string(),
            precedence: 5,
            medium: Medium::Basic {
                ior: 1.4,
                cauchy_b: 0.0,
                max_extinction: 1.0,
                absorption: Spectrum::Uniform { value: 0.1 },
                sss: Some(Sss {
                    scatter: Spectrum::Uniform { value: 4.0 },
                    phase: PhaseFunction::HenyeyGreenstein {
                        g: Spectrum::Uniform { value: 0.8 },
                    },
                }),
            },
        };
        let basic = medium.build(1);
        assert_eq!(basic.find("uid").unwrap().text(), "11");
        let sss = basic.find("basic").unwrap().find("subsurface_scattering").unwrap();
        assert!(sss.find("scattering_coefficient_spectrum").is_some());
        let phase = sss.find("phase_function").unwrap();
        assert!(phase.find("henyey_greenstein").is_some());
    }

    #[test]
    fn test_skin_layer_mediums() {
        let dermis = NamedMedium {
            name: "d".to_string(),
            precedence: 1,
            medium: Medium::Dermis { hemoglobin_fraction: 0.02 },
        };
        assert_eq!(
            dermis.build(0).find("dermis").unwrap().find("hemoglobin_fraction").unwrap().text(),
            "0.02"
        );

        let epidermis = NamedMedium {
            name: "e".to_string(),
            precedence: 1,
            medium: Medium::Epidermis { melanin_fraction: 0.1, melanin_type_blend: 0.5 },
        };
        let node = epidermis.build(1);
        assert_eq!(node.find("epidermis").unwrap().find("melanin_fraction").unwrap().text(), "0.1");
    }

    #[test]
    fn test_default_basic_uid_follows_scene_mediums() {
        let node = NamedMedium::default_basic(3);
        assert_eq!(node.find("name").unwrap().text(), "basic");
        assert_eq!(node.find("uid").unwrap().text(), "13");
    }
}
