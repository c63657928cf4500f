//! Error types for the Account actor.

use crate::model::{AccountId, Rupees};
use crate::store::StoreError;
use thiserror::Error;

/// Errors that can occur during account and wallet operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// The requested account was not found.
    #[error("Account not found: {0}")]
    NotFound(AccountId),

    #[error("Account already exists: {0}")]
    AlreadyExists(String),

    /// Ledger amounts must be positive.
    #[error("Amount must be greater than zero")]
    InvalidAmount,

    /// A credit that would push the balance past the largest representable amount.
    #[error("Amount {amount} is too large for a wallet holding {balance}")]
    BalanceOverflow { balance: Rupees, amount: Rupees },

    /// A debit larger than the balance.
    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { available: Rupees, requested: Rupees },

    /// Profile data that fails validation.
    #[error("Account validation error: {0}")]
    Validation(String),

    /// Balance and ledger disagree.
    #[error("Ledger for {id} does not reconcile: balance {balance}, ledger total {ledger_total}")]
    Unreconciled {
        id: AccountId,
        balance: Rupees,
        ledger_total: i128,
    },

    #[error("Account persistence error: {0}")]
    Store(#[from] StoreError),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
