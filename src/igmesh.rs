//! Binary mesh artifact serialization.
//!
//! The exporter treats mesh serialization as an external service: it hands
//! over the evaluated mesh and an output path and gets back the two facts
//! the document needs (used material slots, shading-normal usage). The
//! bundled [`IgmeshWriter`] writes a compact little-endian layout; hosts
//! with their own writer implement [`MeshSerializer`] instead.

use crate::error::{ExportError, Result};
use crate::scene::{MeshSnapshot, SceneObject};
use std::collections::BTreeSet;
use std::path::Path;

/// Facts derived from face data during serialization, needed to build the
/// mesh's document fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshStats {
    /// Material slot indices referenced by at least one face.
    pub used_material_indices: BTreeSet<usize>,
    /// True when any face is smooth-shaded.
    pub uses_shading_normals: bool,
}

/// External mesh serialization service.
pub trait MeshSerializer {
    /// Write the binary artifact at `path` and return its face stats.
    fn serialize(&self, obj: &SceneObject, mesh: &MeshSnapshot, path: &Path) -> Result<MeshStats>;
}

/// Derive [`MeshStats`] by scanning face data only, without writing.
///
/// The skip-existing-mesh path uses this; it must agree with what a fresh
/// [`MeshSerializer::serialize`] call would report for the same geometry.
pub fn scan_face_stats(mesh: &MeshSnapshot) -> MeshStats {
    let mut used_material_indices = BTreeSet::new();
    let mut num_smooth = 0usize;
    for face in &mesh.faces {
        used_material_indices.insert(face.material_index);
        if face.use_smooth {
            num_smooth += 1;
        }
    }
    MeshStats {
        used_material_indices,
        uses_shading_normals: num_smooth > 0,
    }
}

const IGMESH_MAGIC: u32 = 0x4947_4D53; // "IGMS"
const IGMESH_VERSION: u32 = 1;

/// Bundled binary mesh writer.
#[derive(Debug, Clone, Copy, Default)]
pub struct IgmeshWriter;

impl MeshSerializer for IgmeshWriter {
    fn serialize(&self, obj: &SceneObject, mesh: &MeshSnapshot, path: &Path) -> Result<MeshStats> {
        let mut buf: Vec<u8> =
            Vec::with_capacity(24 + mesh.vertices.len() * 12 + mesh.faces.len() * 8);

        buf.extend_from_slice(&IGMESH_MAGIC.to_le_bytes());
        buf.extend_from_slice(&IGMESH_VERSION.to_le_bytes());
        buf.extend_from_slice(&(obj.material_slots.len() as u32).to_le_bytes());

        buf.extend_from_slice(&(mesh.vertices.len() as u32).to_le_bytes());
        for v in &mesh.vertices {
            buf.extend_from_slice(&v.x.to_le_bytes());
            buf.extend_from_slice(&v.y.to_le_bytes());
            buf.extend_from_slice(&v.z.to_le_bytes());
        }

        buf.extend_from_slice(&(mesh.faces.len() as u32).to_le_bytes());
        for face in &mesh.faces {
            buf.extend_from_slice(&(face.material_index as u32).to_le_bytes());
            buf.extend_from_slice(&(face.use_smooth as u32).to_le_bytes());
        }

        std::fs::write(path, &buf).map_err(|e| {
            ExportError::MeshSerialization(format!("cannot write '{}': {}", path.display(), e))
        })?;

        Ok(scan_face_stats(mesh))
    }
}
