//! Persisted record shapes that differ from the in-memory model.

use crate::model::{
    AccountId, CartItem, EntryTags, OrderId, Role, Rupees, TransactionKind, WalletTransaction,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A wallet transaction as stored in `adminTransactions` / `userTransactions`.
///
/// The owner is written as `adminId` or `userId` depending on the ledger it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDocument {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_id: Option<AccountId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<AccountId>,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: Rupees,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<AccountId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_admin: Option<AccountId>,
    pub timestamp: DateTime<Utc>,
    pub date: NaiveDate,
}

impl TransactionDocument {
    pub fn from_entry(role: Role, entry: &WalletTransaction) -> Self {
        let (admin_id, user_id) = match role {
            Role::Admin => (Some(entry.owner.clone()), None),
            Role::User => (None, Some(entry.owner.clone())),
        };
        Self {
            id: entry.id.clone(),
            admin_id,
            user_id,
            kind: entry.kind,
            amount: entry.amount,
            description: entry.description.clone(),
            order_id: entry.tags.order_id.clone(),
            recipient_id: entry.tags.recipient_id.clone(),
            recipient_name: entry.tags.recipient_name.clone(),
            from_admin: entry.tags.from_admin.clone(),
            timestamp: entry.timestamp,
            date: entry.date,
        }
    }

    /// Validates the document and turns it back into a ledger entry.
    pub fn into_entry(self, role: Role) -> Result<WalletTransaction, String> {
        let owner = match role {
            Role::Admin => self.admin_id,
            Role::User => self.user_id,
        }
        .ok_or_else(|| format!("transaction {} has no {} owner", self.id, role))?;
        if self.amount.is_zero() {
            return Err(format!("transaction {} has a zero amount", self.id));
        }
        Ok(WalletTransaction {
            id: self.id,
            owner,
            kind: self.kind,
            amount: self.amount,
            description: self.description,
            date: self.date,
            timestamp: self.timestamp,
            tags: EntryTags {
                order_id: self.order_id,
                recipient_id: self.recipient_id,
                recipient_name: self.recipient_name,
                from_admin: self.from_admin,
            },
        })
    }
}

/// One shopper's saved cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartRecord {
    pub owner: AccountId,
    pub items: Vec<CartItem>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn transfer_debit() -> WalletTransaction {
        let timestamp = Utc::now();
        WalletTransaction {
            id: "txn_1_1".into(),
            owner: AccountId::from("admin_001"),
            kind: TransactionKind::Debit,
            amount: Rupees(1000),
            description: "Transfer to Asha".into(),
            date: timestamp.date_naive(),
            timestamp,
            tags: EntryTags::transfer_to(AccountId::from("asha_1"), "Asha"),
        }
    }

    #[test]
    fn test_admin_document_shape() {
        let doc = TransactionDocument::from_entry(Role::Admin, &transfer_debit());
        let value = serde_json::to_value(&doc).unwrap();

        assert_eq!(value["adminId"], json!("admin_001"));
        assert_eq!(value["type"], json!("debit"));
        assert_eq!(value["amount"], json!(1000));
        assert_eq!(value["recipientId"], json!("asha_1"));
        assert!(value.get("userId").is_none());
        assert!(value.get("orderId").is_none());
    }

    #[test]
    fn test_into_entry_requires_owner_of_role() {
        let entry = transfer_debit();
        let doc = TransactionDocument::from_entry(Role::Admin, &entry);
        assert!(doc.clone().into_entry(Role::User).is_err());
        assert_eq!(doc.into_entry(Role::Admin).unwrap(), entry);
    }

    #[test]
    fn test_zero_amount_rejected() {
        let mut doc = TransactionDocument::from_entry(Role::Admin, &transfer_debit());
        doc.amount = Rupees::ZERO;
        assert!(doc.into_entry(Role::Admin).unwrap_err().contains("zero amount"));
    }
}
