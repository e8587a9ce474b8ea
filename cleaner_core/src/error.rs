//! Error types shared by every Smart Cleaner crate

use thiserror::Error;

/// Result alias used throughout the workspace
pub type CleanerResult<T> = std::result::Result<T, CleanerError>;

#[derive(Debug, Error)]
pub enum CleanerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Communication error: {0}")]
    Communication(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),

    /// Every reading in the forward sector was a no-return.
    #[error("no valid range in forward sector ({sector_len} readings, all <= {min_valid_range})")]
    EmptyForwardSector {
        sector_len: usize,
        min_valid_range: f32,
    },

    /// Frame buffer does not describe a supported color raster.
    #[error("malformed frame: {0}")]
    MalformedFrame(String),
}

impl CleanerError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn communication(msg: impl Into<String>) -> Self {
        Self::Communication(msg.into())
    }

    pub fn malformed_frame(msg: impl Into<String>) -> Self {
        Self::MalformedFrame(msg.into())
    }

    /// Faults that must stop the robot rather than be skipped.
    pub fn is_fatal_to_motion(&self) -> bool {
        matches!(self, Self::EmptyForwardSector { .. })
    }
}
