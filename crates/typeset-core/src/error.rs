//! Error types for typeset

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TypesetError>;

/// Main error type for typeset
#[derive(Debug, Error)]
pub enum TypesetError {
    #[error("No typeface resolvable for code units {start}..{end}")]
    MissingTypeface { start: usize, end: usize },

    #[error("Invalid type size {size} for code units {start}..{end}")]
    InvalidTypeSize { size: f32, start: usize, end: usize },

    #[error("Shaping failed: {0}")]
    ShapingFailed(#[from] ShapingError),

    #[error("Rendering failed: {0}")]
    RenderingFailed(#[from] RenderError),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Shaping errors
#[derive(Debug, Error)]
pub enum ShapingError {
    #[error("Cluster map covers {actual} code units, expected {expected}")]
    ClusterMapMismatch { expected: usize, actual: usize },

    #[error("Glyph arrays disagree: {ids} ids, {offsets} offsets, {advances} advances")]
    GlyphArrayMismatch {
        ids: usize,
        offsets: usize,
        advances: usize,
    },

    #[error("Backend error: {0}")]
    BackendError(String),
}

/// Rendering errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Backend error: {0}")]
    BackendError(String),
}
