//! # IGS Exporter
//!
//! A Rust library for exporting host application scenes to IGS XML scene
//! descriptions with deduplicated binary mesh artifacts.
//!
//! ## Overview
//!
//! This library takes a scene exposed through the `SceneSource` trait and
//! produces a renderer-ready output set: a main `.igs` document, a
//! per-frame scenedata document with one instance record per placement,
//! and content-addressed `.igmesh` files shared between identical meshes.
//! Motion blur is handled by sampling object and camera transforms over
//! the camera's shutter interval and emitting keyframe tracks.
//!
//! ## Quick Start
//!
//! ```ignore
//! use igs_exporter::{export_scene, ExportConfig, ExportInput, IgmeshWriter};
//!
//! // Adapt the host scene (implements SceneSource)
//! let mut scene = MyHostScene::open("shot.blend")?;
//!
//! let config = ExportConfig {
//!     export_path: "/renders/shot".into(),
//!     filename: "shot.igs".to_string(),
//!     scene_file_stem: "shot".to_string(),
//!     raise_on_error: false,
//! };
//!
//! let mut input = ExportInput { scene: &mut scene, background_set: None };
//! let outcome = export_scene(&mut input, &IgmeshWriter, &config)?;
//! ```
//!
//! ## Library Integration
//!
//! Hosts own the scene graph; the exporter only borrows it. Implement
//! `SceneSource` for your scene wrapper and `SceneMaterial` for your
//! material settings. Hosts with their own binary mesh writer implement
//! `MeshSerializer` instead of using the bundled `IgmeshWriter`.

pub mod document;
pub mod error;
pub mod export;
pub mod igmesh;
pub mod scene;

#[cfg(test)]
pub(crate) mod testutil;

// Re-export main types for convenience
pub use document::{write_document, DocNode, Scalar};
pub use error::{ExportError, Result};
pub use export::{
    export_scene, ExportConfig, ExportInput, ExportOutcome, ExportStats, ExportedMesh,
};
pub use igmesh::{IgmeshWriter, MeshSerializer, MeshStats};
pub use scene::{
    Camera, CameraSettings, DupliInstance, LampSettings, LayerMask, LightLayers, MeshSnapshot,
    ObjectId, ObjectKind, RenderSettings, SceneMaterial, SceneObject, SceneSource, Spectrum,
};
