//! Error types for the persistence layer.

use thiserror::Error;

/// Errors that can occur while reading or writing persisted state.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The remote document database rejected or failed the call.
    #[error("Remote {operation} on '{collection}' failed: {reason}")]
    RemoteOperationFailed {
        operation: &'static str,
        collection: String,
        reason: String,
    },

    /// A persisted record failed boundary validation.
    #[error("Corrupt record in '{collection}': {reason}")]
    Corrupt { collection: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn corrupt(collection: impl Into<String>, reason: impl Into<String>) -> Self {
        StoreError::Corrupt {
            collection: collection.into(),
            reason: reason.into(),
        }
    }
}
