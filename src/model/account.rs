use crate::model::{Rupees, WalletTransaction};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for user and admin accounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub String);

impl AccountId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => f.write_str("user"),
            Role::Admin => f.write_str("admin"),
        }
    }
}

/// Postal address. `state` and `country` are informational; delivery needs the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub pincode: String,
    #[serde(default)]
    pub country: String,
}

impl Address {
    /// Names of the delivery fields that are blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("street", &self.street),
            ("city", &self.city),
            ("pincode", &self.pincode),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }

    pub fn is_deliverable(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

/// A user or admin: profile plus wallet.
///
/// # Actor Framework
/// This struct implements the [`ActorEntity`](actor_framework::ActorEntity) trait,
/// allowing it to be managed by a [`ResourceActor`](actor_framework::ResourceActor).
/// The ledger operations live in [`crate::account_actor`].
///
/// `ledger` holds every wallet transaction oldest first. It is persisted as separate
/// transaction records, not inside the account record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: AccountId,
    pub role: Role,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub wallet_balance: Rupees,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    pub ledger: Vec<WalletTransaction>,
}

/// A credit posted as part of account creation (welcome bonus, admin float).
#[derive(Debug, Clone)]
pub struct OpeningCredit {
    pub amount: Rupees,
    pub description: String,
}

/// Payload for creating a new account. Accounts carry their own id.
#[derive(Debug, Clone)]
pub struct AccountCreate {
    pub id: AccountId,
    pub role: Role,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<Address>,
    pub profile_picture: Option<String>,
    pub opening_credit: Option<OpeningCredit>,
}

impl AccountCreate {
    pub fn new(id: AccountId, role: Role, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            role,
            name: name.into(),
            email: email.into(),
            phone: None,
            address: None,
            profile_picture: None,
            opening_credit: None,
        }
    }

    pub fn with_opening_credit(mut self, amount: Rupees, description: impl Into<String>) -> Self {
        self.opening_credit = Some(OpeningCredit {
            amount,
            description: description.into(),
        });
        self
    }
}

/// Profile edits. The wallet balance is deliberately absent: it only moves through
/// ledger actions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<Address>,
    pub profile_picture: Option<String>,
}
