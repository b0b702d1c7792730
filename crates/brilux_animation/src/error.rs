//! Error types for brilux_animation

use thiserror::Error;

/// Errors raised while building or driving animations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// A delay was negative or not a number
    #[error("invalid {field}: {value} (delays must be finite and non-negative)")]
    InvalidDelay { field: &'static str, value: f32 },

    /// The element was never mounted or has been unmounted
    #[error("unknown animated element")]
    UnknownElement,
}
