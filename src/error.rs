//! Setup-time error types
//!
//! Only configuration and catalog problems are errors. Runtime conditions
//! (skipped spawns, rejected gestures, storage hiccups) are handled in place.

use thiserror::Error;

/// Invalid tuning document
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning parse failed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning field `{field}` must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("tuning field `{field}` must be at least {min}, got {value}")]
    BelowMinimum {
        field: &'static str,
        value: f32,
        min: f32,
    },
    #[error("tuning field `{field}` must be non-zero")]
    Zero { field: &'static str },
    #[error("tuning field `{min_field}` exceeds `{max_field}`")]
    InvertedRange {
        min_field: &'static str,
        max_field: &'static str,
    },
}

/// Malformed texture catalog
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("texture catalog has no item types")]
    Empty,
    #[error("item type `{name}` has no frames")]
    NoFrames { name: String },
    #[error("item type `{name}` is listed twice")]
    DuplicateType { name: String },
    #[error("texture catalog has {count} types, at most {max} supported")]
    TooManyTypes { count: usize, max: usize },
}

/// Anything that prevents a session from being constructed
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Tuning(#[from] TuningError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
