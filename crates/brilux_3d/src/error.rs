//! Error types for model loading

use thiserror::Error;

/// Why a showcase model failed to load
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The material library could not be fetched or parsed
    #[error("failed to load material library {path}: {reason}")]
    MaterialLoad { path: String, reason: String },

    /// The geometry could not be fetched or parsed
    #[error("failed to load geometry {path}: {reason}")]
    GeometryLoad { path: String, reason: String },

    /// The format tag names no supported format
    #[error("unsupported model format: {0}")]
    UnsupportedFormat(String),

    /// The load was aborted before it finished
    #[error("model load cancelled")]
    Cancelled,
}

impl LoadError {
    pub(crate) fn material(path: &str, reason: impl ToString) -> Self {
        LoadError::MaterialLoad {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn geometry(path: &str, reason: impl ToString) -> Self {
        LoadError::GeometryLoad {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Failure of an [`AssetSource`](crate::source::AssetSource) fetch
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("asset not found: {0}")]
    NotFound(String),

    #[error("failed to read {path}: {reason}")]
    Io { path: String, reason: String },

    /// Path escapes the asset root
    #[error("invalid asset path: {0}")]
    InvalidPath(String),
}
