//! Admin-to-user wallet transfers.

use crate::account_actor::AccountError;
use crate::clients::AccountClient;
use crate::model::{AccountId, EntryTags, Rupees, WalletTransaction};
use thiserror::Error;
use tracing::{error, info, instrument, warn};

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Transfer amount must be greater than zero")]
    InvalidAmount,

    #[error("Admin account not found: {0}")]
    AdminNotFound(AccountId),

    #[error("User not found: {0}")]
    UserNotFound(AccountId),

    #[error("Insufficient admin balance: requested {requested}, available {available}")]
    InsufficientFunds { available: Rupees, requested: Rupees },

    /// The user credit failed and the admin debit was refunded.
    #[error("Transfer reversed, crediting the user failed: {source}")]
    Reversed {
        #[source]
        source: AccountError,
    },

    /// The user credit failed and so did the refund: the admin is short by `amount`.
    #[error("Transfer partially applied: admin debited {amount} ({debit_id}) but the user was not credited: {source}")]
    PartiallyApplied {
        debit_id: String,
        amount: Rupees,
        #[source]
        source: AccountError,
    },

    #[error(transparent)]
    Account(#[from] AccountError),
}

/// Both sides of a completed transfer.
#[derive(Debug, Clone)]
pub struct TransferReceipt {
    pub debit: WalletTransaction,
    pub credit: WalletTransaction,
}

/// Moves funds from an admin wallet to a user wallet as a debit/credit pair.
#[derive(Clone, Debug)]
pub struct TransferService {
    admins: AccountClient,
    users: AccountClient,
}

impl TransferService {
    pub fn new(admins: AccountClient, users: AccountClient) -> Self {
        Self { admins, users }
    }

    /// Transfers `amount` from `admin_id` to `user_id`.
    ///
    /// Nothing changes unless the amount is positive, both accounts exist and the admin
    /// debit succeeds; the debit checks the balance in the same actor message that
    /// applies it. `description` defaults to `Transfer to <user name>`.
    #[instrument(skip(self, description))]
    pub async fn try_transfer(
        &self,
        admin_id: &AccountId,
        user_id: &AccountId,
        amount: Rupees,
        description: Option<&str>,
    ) -> Result<TransferReceipt, TransferError> {
        if amount.is_zero() {
            return Err(TransferError::InvalidAmount);
        }
        let admin = self.admins.require(admin_id).await.map_err(|e| match e {
            AccountError::NotFound(id) => TransferError::AdminNotFound(id),
            other => other.into(),
        })?;
        let user = self.users.require(user_id).await.map_err(|e| match e {
            AccountError::NotFound(id) => TransferError::UserNotFound(id),
            other => other.into(),
        })?;

        let given = description.map(str::trim).filter(|d| !d.is_empty());
        let description = given
            .map(str::to_string)
            .unwrap_or_else(|| format!("Transfer to {}", user.name));
        let credit_description = match given {
            Some(d) => format!("Transfer from admin: {}", d),
            None => "Transfer from admin".to_string(),
        };

        let debit = self
            .admins
            .debit(
                admin.id.clone(),
                amount,
                description.clone(),
                EntryTags::transfer_to(user.id.clone(), user.name.clone()),
            )
            .await
            .map_err(|e| match e {
                AccountError::InsufficientFunds { available, requested } => {
                    TransferError::InsufficientFunds { available, requested }
                }
                other => other.into(),
            })?;

        let credit = self
            .users
            .credit(
                user.id.clone(),
                amount,
                credit_description,
                EntryTags::transfer_from(admin.id.clone()),
            )
            .await;

        match credit {
            Ok(credit) => {
                info!(admin = %admin.id, user = %user.id, %amount, "Transfer completed");
                Ok(TransferReceipt { debit, credit })
            }
            Err(e) => Err(self.reverse(&admin.id, &debit, e).await),
        }
    }

    async fn reverse(&self, admin_id: &AccountId, debit: &WalletTransaction, source: AccountError) -> TransferError {
        warn!(admin = %admin_id, debit = %debit.id, error = %source, "User credit failed, reversing admin debit");
        let refund = self
            .admins
            .credit(
                admin_id.clone(),
                debit.amount,
                format!("Reversal: {}", debit.description),
                EntryTags::default(),
            )
            .await;
        match refund {
            Ok(_) => TransferError::Reversed { source },
            Err(refund_error) => {
                error!(
                    admin = %admin_id,
                    debit = %debit.id,
                    amount = %debit.amount,
                    error = %refund_error,
                    "Transfer reversal failed, admin debit stands without a matching credit"
                );
                TransferError::PartiallyApplied {
                    debit_id: debit.id.clone(),
                    amount: debit.amount,
                    source,
                }
            }
        }
    }

    /// `true` when the transfer completed; failures are logged.
    pub async fn transfer(
        &self,
        admin_id: &AccountId,
        user_id: &AccountId,
        amount: Rupees,
        description: Option<&str>,
    ) -> bool {
        match self.try_transfer(admin_id, user_id, amount, description).await {
            Ok(_) => true,
            Err(e) => {
                warn!(admin = %admin_id, user = %user_id, %amount, error = %e, "Transfer failed");
                false
            }
        }
    }
}
