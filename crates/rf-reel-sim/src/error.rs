//! Error types for reel simulation

use thiserror::Error;

/// Reel simulation errors
#[derive(Error, Debug)]
pub enum SimError {
    /// Configuration rejected before any trial ran
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Primitive called with an out-of-contract argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SimError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    pub(crate) fn argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Is this a configuration error?
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::InvalidConfiguration(_))
    }
}

/// Result type for reel simulation operations
pub type SimResult<T> = Result<T, SimError>;
