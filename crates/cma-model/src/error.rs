// error.rs — Error types for snapshot loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from reading and deserializing catalog snapshots.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse YAML snapshot: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to parse JSON snapshot: {0}")]
    Json(#[from] serde_json::Error),

    /// Snapshot files must end in .yaml/.yml/.json.
    #[error("unsupported snapshot format for '{path}' (expected .yaml, .yml, or .json)")]
    UnsupportedFormat { path: PathBuf },
}
