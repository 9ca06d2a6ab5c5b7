//! Error types for isocrate

use thiserror::Error;

/// Main error type for isocrate operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    #[error("Invalid resolution: {0}")]
    InvalidResolution(String),

    #[error("Invalid bounds: {0}")]
    InvalidBounds(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Non-finite field value {value} at ({x}, {y}, {z})")]
    NonFiniteSample { x: f32, y: f32, z: f32, value: f32 },

    #[error("Degenerate cell: {0}")]
    DegenerateCell(String),

    #[error("Table authoring error: {0}")]
    Authoring(String),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

/// Result type alias for isocrate operations
pub type Result<T> = std::result::Result<T, Error>;
