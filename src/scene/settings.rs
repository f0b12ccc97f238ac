//! Render engine settings and the document root.

use crate::document::DocNode;
use serde::{Deserialize, Serialize};

/// Renderer settings read from the host's render properties. Building
/// these also creates the root `scene` element everything else hangs off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub fps_base: f64,
    /// Current playback frame; export starts here.
    pub frame_current: i32,
    pub motion_blur: bool,
    pub skip_existing_meshes: bool,
    /// Halt after this many seconds; -1 disables.
    pub halt_time: i32,
    /// Halt after this many samples per pixel; -1 disables.
    pub halt_spp: i32,
    pub bidirectional: bool,
    pub metropolis: bool,
    pub super_sample_factor: u32,
    pub foreground_alpha: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            fps: 24.0,
            fps_base: 1.0,
            frame_current: 1,
            motion_blur: false,
            skip_existing_meshes: false,
            halt_time: -1,
            halt_spp: -1,
            bidirectional: true,
            metropolis: false,
            super_sample_factor: 2,
            foreground_alpha: false,
        }
    }
}

impl RenderSettings {
    /// Effective frames per second.
    pub fn effective_fps(&self) -> f64 {
        self.fps / self.fps_base
    }

    /// Build the root `scene` element with the renderer settings block.
    pub fn build_scene_root(&self) -> DocNode {
        DocNode::new("scene").child(
            DocNode::new("renderer_settings")
                .field("width", self.width as i64)
                .field("height", self.height as i64)
                .field("halt_time", self.halt_time)
                .field("halt_samples_per_pixel", self.halt_spp)
                .field("bidirectional", self.bidirectional)
                .field("metropolis", self.metropolis)
                .field("super_sample_factor", self.super_sample_factor as i64)
                .field("foreground_alpha", self.foreground_alpha),
        )
    }
}
