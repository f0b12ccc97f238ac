//! The export pipeline.
//!
//! All caches and counters live in an [`ExportContext`] created for one
//! export invocation and discarded afterwards; nothing is shared between
//! runs. The pipeline is single-threaded and not re-entrant.

pub mod cache;
pub mod instance;
pub mod lighting;
pub mod material;
pub mod mesh;
pub mod orchestrator;
pub mod transform;
pub mod traverse;

pub use cache::ExportCache;
pub use instance::{InstanceKey, InstanceRecord};
pub use mesh::ExportedMesh;
pub use orchestrator::{ExportInput, ExportStats};

use crate::document::DocNode;
use crate::error::Result;
use crate::igmesh::MeshSerializer;
use crate::scene::ObjectId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::error;

/// Export invocation settings handed over by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Output directory for the scene document and mesh artifacts.
    pub export_path: PathBuf,
    /// Filename of the main scene document, e.g. `"shot.igs"`.
    pub filename: String,
    /// Stem of the host scene file; names the mesh and frame directories.
    pub scene_file_stem: String,
    /// Diagnostics override: propagate internal failures instead of
    /// reporting a cancelled export.
    #[serde(default)]
    pub raise_on_error: bool,
}

/// Outcome reported back to the host.
#[derive(Debug)]
pub enum ExportOutcome {
    Finished(ExportStats),
    Cancelled,
}

/// Mutable per-invocation state: every cache and counter of the run.
/// Passed explicitly into each export call; there is no global state.
pub struct ExportContext {
    /// Material name -> document fragments, in first-use order.
    pub(crate) materials: ExportCache<String, Vec<DocNode>>,
    /// Instance key -> instance record, in first-seen order.
    pub(crate) objects: ExportCache<InstanceKey, InstanceRecord>,
    /// Lamp object name -> document fragments. Two lamps sharing a name
    /// collapse to the later one (host quirk, preserved).
    pub(crate) lamps: ExportCache<String, Vec<DocNode>>,
    /// Fast path: object handle -> exported mesh artifact.
    pub(crate) meshes_by_object: HashMap<ObjectId, Rc<ExportedMesh>>,
    /// Cross-object dedup: content fingerprint -> exported mesh artifact.
    pub(crate) meshes_on_disk: ExportCache<String, Rc<ExportedMesh>>,
    /// Normalised sample time of the frame currently being traversed.
    pub(crate) normalised_time: f64,
    /// Serial counter of exported instances, informational only.
    pub(crate) instance_count: u64,
    pub(crate) mesh_dir: PathBuf,
    pub(crate) rel_mesh_dir: String,
    pub(crate) skip_existing: bool,
}

impl ExportContext {
    pub(crate) fn new(mesh_dir: PathBuf, rel_mesh_dir: String, skip_existing: bool) -> Self {
        Self {
            materials: ExportCache::new("Materials"),
            objects: ExportCache::new("Objects"),
            lamps: ExportCache::new("Lamps"),
            meshes_by_object: HashMap::new(),
            meshes_on_disk: ExportCache::new("Meshes"),
            normalised_time: 0.0,
            instance_count: 0,
            mesh_dir,
            rel_mesh_dir,
            skip_existing,
        }
    }
}

/// Run a full export.
///
/// Setup failures and fatal pipeline failures are caught here, logged and
/// reported as [`ExportOutcome::Cancelled`]; with
/// [`ExportConfig::raise_on_error`] set they propagate to the caller
/// instead.
pub fn export_scene(
    input: &mut ExportInput<'_>,
    serializer: &dyn MeshSerializer,
    config: &ExportConfig,
) -> Result<ExportOutcome> {
    match orchestrator::run_export(input, serializer, config) {
        Ok(stats) => Ok(ExportOutcome::Finished(stats)),
        Err(err) => {
            error!("export failed: {}", err);
            if config.raise_on_error {
                Err(err)
            } else {
                Ok(ExportOutcome::Cancelled)
            }
        }
    }
}
