use thiserror::Error;

/// Failures reported by a [`DocumentStore`](crate::DocumentStore) or the typed layer above it.
///
/// Repositories pass these through unchanged; nothing in this crate retries.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Network or service failure; the request may or may not have been applied
    #[error("Remote store unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    #[error("Permission denied on {collection}: {reason}")]
    PermissionDenied { collection: String, reason: String },

    /// The store refused the request (duplicate ID, schema mismatch, bad query)
    #[error("Remote store rejected {operation} on {collection}: {reason}")]
    Rejected { collection: String, operation: &'static str, reason: String },

    /// A document did not match the typed record it was read as
    #[error("Malformed {collection} document {id}: {source}")]
    Decode {
        collection: String,
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed response from remote store: {reason}")]
    Protocol { reason: String },

    #[error("Invalid store configuration: {reason}")]
    Configuration { reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub fn not_found(collection: &str, id: &str) -> Self {
        Self::NotFound { collection: collection.to_string(), id: id.to_string() }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable { reason: reason.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable { .. })
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::Protocol { reason: error.to_string() }
        } else {
            Self::Unavailable { reason: error.to_string() }
        }
    }
}
