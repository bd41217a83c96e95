use crate::policy::PolicyViolation;
use campus_entity::ValidationError;
use campus_store::StoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced to the view layer
#[derive(Error, Debug)]
pub enum ClientError {
    /// The remote store failed or refused the request
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// User input was rejected before any remote call
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// An application rule blocked the request before any remote call
    #[error("Policy violation: {0}")]
    Policy(#[from] PolicyViolation),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ClientError {
    /// True when the error is a remote-store `NotFound`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Store(e) if e.is_not_found())
    }
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors loading or validating [`ClientConfig`](crate::ClientConfig)
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("Missing required setting: {field}")]
    Missing { field: &'static str },
}
