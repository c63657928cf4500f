//! Error types for the Discount actor.

use crate::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiscountError {
    /// No code with this name exists.
    #[error("Invalid discount code: {0}")]
    NotFound(String),

    #[error("Discount code already exists: {0}")]
    AlreadyExists(String),

    /// The code exists but is switched off.
    #[error("Discount code {0} is not active")]
    Inactive(String),

    #[error("Discount validation error: {0}")]
    Validation(String),

    #[error("Discount persistence error: {0}")]
    Store(#[from] StoreError),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
