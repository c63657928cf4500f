//! Session-level errors.
//!
//! Every failure a session can report is a [`StorefrontError`]. [`StorefrontError::kind`]
//! sorts it into the handful of categories a front end reacts to, and
//! [`StorefrontError::notice`] renders the blocking message that names the failed
//! operation.

use crate::account_actor::AccountError;
use crate::config::ConfigError;
use crate::discount_actor::DiscountError;
use crate::order_actor::OrderError;
use crate::product_actor::ProductError;
use crate::services::{CheckoutError, TransferError};
use crate::store::StoreError;
use std::fmt::Display;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad input; fix the form and resubmit.
    Validation,
    InsufficientFunds,
    NotFound,
    /// The database call failed; retrying may help.
    RemoteOperationFailed,
    InvalidTransition,
    /// Not signed in, or wrong credentials.
    Unauthorized,
    Internal,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ErrorKind::Validation => "validation",
            ErrorKind::InsufficientFunds => "insufficient-funds",
            ErrorKind::NotFound => "not-found",
            ErrorKind::RemoteOperationFailed => "remote-operation-failed",
            ErrorKind::InvalidTransition => "invalid-transition",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::Internal => "internal",
        })
    }
}

#[derive(Debug, Error)]
pub enum StorefrontError {
    #[error("Please sign in first")]
    NotSignedIn,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Account(#[from] AccountError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Product(#[from] ProductError),

    #[error(transparent)]
    Discount(#[from] DiscountError),

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error(transparent)]
    Checkout(#[from] CheckoutError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn store_kind(e: &StoreError) -> ErrorKind {
    match e {
        StoreError::RemoteOperationFailed { .. } => ErrorKind::RemoteOperationFailed,
        _ => ErrorKind::Internal,
    }
}

fn account_kind(e: &AccountError) -> ErrorKind {
    match e {
        AccountError::InvalidAmount
        | AccountError::BalanceOverflow { .. }
        | AccountError::Validation(_)
        | AccountError::AlreadyExists(_) => ErrorKind::Validation,
        AccountError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
        AccountError::NotFound(_) => ErrorKind::NotFound,
        AccountError::Store(e) => store_kind(e),
        AccountError::Unreconciled { .. } | AccountError::ActorCommunicationError(_) => ErrorKind::Internal,
    }
}

fn order_kind(e: &OrderError) -> ErrorKind {
    match e {
        OrderError::Validation(_) | OrderError::Immutable(_) | OrderError::AlreadyExists(_) => {
            ErrorKind::Validation
        }
        OrderError::NotFound(_) => ErrorKind::NotFound,
        OrderError::InvalidTransition { .. } => ErrorKind::InvalidTransition,
        OrderError::Store(e) => store_kind(e),
        OrderError::ActorCommunicationError(_) => ErrorKind::Internal,
    }
}

fn product_kind(e: &ProductError) -> ErrorKind {
    match e {
        ProductError::Validation(_) | ProductError::InvalidQuantity(_) | ProductError::AlreadyExists(_) => {
            ErrorKind::Validation
        }
        ProductError::NotFound(_) => ErrorKind::NotFound,
        ProductError::Store(e) => store_kind(e),
        ProductError::ActorCommunicationError(_) => ErrorKind::Internal,
    }
}

fn discount_kind(e: &DiscountError) -> ErrorKind {
    match e {
        DiscountError::Inactive(_) | DiscountError::Validation(_) | DiscountError::AlreadyExists(_) => {
            ErrorKind::Validation
        }
        DiscountError::NotFound(_) => ErrorKind::NotFound,
        DiscountError::Store(e) => store_kind(e),
        DiscountError::ActorCommunicationError(_) => ErrorKind::Internal,
    }
}

impl StorefrontError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StorefrontError::NotSignedIn | StorefrontError::InvalidCredentials => ErrorKind::Unauthorized,
            StorefrontError::Validation(_) => ErrorKind::Validation,
            StorefrontError::Account(e) => account_kind(e),
            StorefrontError::Order(e) => order_kind(e),
            StorefrontError::Product(e) => product_kind(e),
            StorefrontError::Discount(e) => discount_kind(e),
            StorefrontError::Transfer(e) => match e {
                TransferError::InvalidAmount => ErrorKind::Validation,
                TransferError::AdminNotFound(_) | TransferError::UserNotFound(_) => ErrorKind::NotFound,
                TransferError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
                TransferError::Reversed { source } => account_kind(source),
                TransferError::PartiallyApplied { .. } => ErrorKind::Internal,
                TransferError::Account(e) => account_kind(e),
            },
            StorefrontError::Checkout(e) => match e {
                CheckoutError::EmptyCart
                | CheckoutError::IncompleteAddress(_)
                | CheckoutError::TotalTooLarge => ErrorKind::Validation,
                CheckoutError::WalletShortfall { .. } => ErrorKind::InsufficientFunds,
                CheckoutError::Discount(e) => discount_kind(e),
                CheckoutError::Account(e) | CheckoutError::PaymentFailed { source: e, .. } => account_kind(e),
                CheckoutError::Order(e) => order_kind(e),
            },
            StorefrontError::Store(e) => store_kind(e),
            StorefrontError::Config(_) => ErrorKind::Internal,
        }
    }

    /// The message shown to the user when `operation` fails.
    ///
    /// Remote failures get a generic retry prompt instead of the database's wording.
    pub fn notice(&self, operation: &str) -> String {
        match self.kind() {
            ErrorKind::RemoteOperationFailed => {
                format!("{} failed: the server could not be reached. Please try again.", operation)
            }
            ErrorKind::Internal => {
                format!("{} failed: something went wrong on our side.", operation)
            }
            _ => format!("{} failed: {}", operation, self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AccountId, OrderId, OrderStatus, Rupees};

    #[test]
    fn test_kinds() {
        let overdraft = StorefrontError::from(TransferError::InsufficientFunds {
            available: Rupees(50_000),
            requested: Rupees(60_000),
        });
        assert_eq!(overdraft.kind(), ErrorKind::InsufficientFunds);

        let missing = StorefrontError::from(AccountError::NotFound(AccountId::from("ghost")));
        assert_eq!(missing.kind(), ErrorKind::NotFound);

        let terminal = StorefrontError::from(OrderError::InvalidTransition {
            id: OrderId::from("KM1"),
            from: OrderStatus::Delivered,
            to: OrderStatus::Pending,
        });
        assert_eq!(terminal.kind(), ErrorKind::InvalidTransition);

        let remote = StorefrontError::from(AccountError::Store(StoreError::RemoteOperationFailed {
            operation: "write",
            collection: "users".into(),
            reason: "timeout".into(),
        }));
        assert_eq!(remote.kind(), ErrorKind::RemoteOperationFailed);

        assert_eq!(StorefrontError::NotSignedIn.kind(), ErrorKind::Unauthorized);
        assert_eq!(StorefrontError::from(CheckoutError::EmptyCart).kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_notice_names_operation() {
        let err = StorefrontError::from(AccountError::InvalidAmount);
        assert_eq!(err.notice("Add funds"), "Add funds failed: Amount must be greater than zero");

        let remote = StorefrontError::from(StoreError::RemoteOperationFailed {
            operation: "read",
            collection: "orders".into(),
            reason: "offline".into(),
        });
        let notice = remote.notice("Load orders");
        assert!(notice.starts_with("Load orders failed"));
        assert!(notice.contains("try again"));
        assert!(!notice.contains("offline"));
    }
}
