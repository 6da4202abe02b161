//! Error types for plume.
//!
//! This module provides error types for emitter configuration, geometry
//! construction, and strict color parsing. Everything that happens per
//! particle is infallible; failures are caught when a configuration is parsed.

use thiserror::Error;

/// Errors that can occur while building a geometry chain.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChainError {
    /// The configuration contained no chain at all.
    #[error("polygonal chain has no vertices")]
    Empty,
    /// A chain needs at least two vertices to form a segment.
    #[error("chain {chain} has {found} vertices, at least 2 are required")]
    NotEnoughPoints {
        /// Index of the offending chain within the configuration.
        chain: usize,
        /// Number of vertices that chain actually had.
        found: usize,
    },
}

/// Errors from the strict color parser ([`Rgb::parse`](crate::color::Rgb::parse)).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ColorError {
    /// Only 6 (RGB) and 8 (ARGB) hex digits are accepted.
    #[error("expected 6 or 8 hex digits, got {0}")]
    InvalidLength(usize),
    /// A character outside `[0-9a-fA-F]`.
    #[error("invalid hex digits in color {0:?}")]
    InvalidDigit(String),
}

/// Errors from building texture data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TextureError {
    #[error("expected {expected} bytes of RGBA data, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// Errors that can occur when parsing emitter configuration.
///
/// A configuration that fails to parse is rejected as a whole: the emitter
/// keeps whatever state it had before and never emits from a half-built shape.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The spawn type needs a shape block that was not provided.
    #[error("spawn type {spawn_type:?} requires the {field:?} field")]
    MissingShape {
        /// Spawn type tag being parsed.
        spawn_type: String,
        /// Configuration field that was missing.
        field: &'static str,
    },
    /// No built-in or registered strategy is known under this name.
    #[error("unknown spawn type {0:?}")]
    UnknownSpawnType(String),
    /// The shape parsed but cannot produce particles.
    #[error("degenerate {spawn_type} shape: {reason}")]
    DegenerateShape {
        /// Spawn type tag being parsed.
        spawn_type: String,
        /// Human-readable description of the problem.
        reason: String,
    },
    /// Geometry chain construction failed.
    #[error("invalid polygon: {0}")]
    Chain(#[from] ChainError),
    /// A value list (alpha, scale, color, ...) was malformed.
    #[error("invalid value list: {0}")]
    InvalidValueList(String),
    /// The JSON document could not be deserialized.
    #[error("failed to parse emitter config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_error_converts_into_config_error() {
        let err: ConfigError = ChainError::NotEnoughPoints { chain: 2, found: 1 }.into();
        assert!(matches!(err, ConfigError::Chain(_)));
        assert_eq!(
            err.to_string(),
            "invalid polygon: chain 2 has 1 vertices, at least 2 are required"
        );
    }

    #[test]
    fn test_missing_shape_message() {
        let err = ConfigError::MissingShape {
            spawn_type: "rect".into(),
            field: "spawnRect",
        };
        assert_eq!(err.to_string(), "spawn type \"rect\" requires the \"spawnRect\" field");
    }
}
