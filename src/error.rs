//! Error types for the scene exporter.

use thiserror::Error;

/// Result type alias using ExportError.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Main error type for export operations.
#[derive(Error, Debug)]
pub enum ExportError {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse JSON settings handed over by the host.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Output directory missing, not creatable or not writable.
    #[error("Output path error: {0}")]
    OutputPath(String),

    /// Scene context handed to the exporter is unusable.
    #[error("Invalid scene context: {0}")]
    InvalidScene(String),

    /// Host could not produce an evaluated mesh for an object.
    #[error("Mesh evaluation failed for object '{0}': {1}")]
    MeshEvaluation(String, String),

    /// Host could not expand the dupli list of a generating object.
    /// Soft failure: the traversal logs it and continues.
    #[error("Cannot create dupli list for object '{0}': {1}")]
    DupliExpansion(String, String),

    /// Failed to write a binary mesh artifact.
    #[error("Mesh serialization error: {0}")]
    MeshSerialization(String),

    /// Failed to assemble or write the scene document.
    #[error("Document error: {0}")]
    Document(String),
}
