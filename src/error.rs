//! Error type shared by every geocluster operation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, GeoclusterError>;

#[derive(Debug, Error)]
pub enum GeoclusterError {
    /// A caller-supplied value violates a constraint (coordinate range,
    /// precision, cell alphabet, viewport dimensions).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A zone statistics source or point lookup failed, or returned data
    /// that does not match what was asked for.
    #[error("Upstream data error: {0}")]
    UpstreamData(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[cfg(feature = "toml")]
    #[error("TOML error: {0}")]
    Toml(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GeoclusterError {
    /// The engine never retries; retry policy belongs to the data sources.
    pub fn is_retryable(&self) -> bool {
        false
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, GeoclusterError::InvalidInput(_))
    }

    pub fn is_upstream(&self) -> bool {
        matches!(self, GeoclusterError::UpstreamData(_))
    }
}
