//! Error types for the merge layer.
//!
//! Conflicts are data, not errors. These variants only cover snapshots that
//! cannot be decoded or fail validation before any merging starts.

use thiserror::Error;

/// Result type for merge operations that start from raw input.
pub type MergeResult<T> = Result<T, MergeError>;

#[derive(Debug, Error)]
pub enum MergeError {
    /// One of the snapshots failed to load or validate.
    #[error("{side} snapshot: {source}")]
    Snapshot {
        side: &'static str,
        #[source]
        source: projectmerge_model::Error,
    },

    /// The merged document could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
