use crate::model::{AccountId, OrderId, Rupees};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Credit,
    Debit,
}

/// One append-only wallet ledger entry. Never mutated or deleted once posted.
#[derive(Debug, Clone, PartialEq)]
pub struct WalletTransaction {
    pub id: String,
    pub owner: AccountId,
    pub kind: TransactionKind,
    pub amount: Rupees,
    pub description: String,
    pub date: NaiveDate,
    pub timestamp: DateTime<Utc>,
    pub tags: EntryTags,
}

/// Optional cross-references attached to a ledger entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryTags {
    /// The order a debit paid for.
    pub order_id: Option<OrderId>,
    /// Recipient of an admin transfer (admin-side debit).
    pub recipient_id: Option<AccountId>,
    pub recipient_name: Option<String>,
    /// Admin that funded a transfer (user-side credit).
    pub from_admin: Option<AccountId>,
}

impl EntryTags {
    pub fn order(order_id: OrderId) -> Self {
        Self {
            order_id: Some(order_id),
            ..Self::default()
        }
    }

    pub fn transfer_to(recipient_id: AccountId, recipient_name: impl Into<String>) -> Self {
        Self {
            recipient_id: Some(recipient_id),
            recipient_name: Some(recipient_name.into()),
            ..Self::default()
        }
    }

    pub fn transfer_from(admin: AccountId) -> Self {
        Self {
            from_admin: Some(admin),
            ..Self::default()
        }
    }
}

impl WalletTransaction {
    /// Signed effect on the owner's balance.
    pub fn signed_amount(&self) -> i128 {
        match self.kind {
            TransactionKind::Credit => i128::from(self.amount.0),
            TransactionKind::Debit => -i128::from(self.amount.0),
        }
    }
}
