//! Error types for brilux_site

use std::path::PathBuf;
use thiserror::Error;

/// Navigation failures; absorbed by the controller
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    /// The id names no section, or the section has no anchor on the page
    #[error("navigation target not found: {0}")]
    TargetNotFound(String),
}

/// Errors while loading or validating `brilux.toml`
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value parsed but is out of range
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
