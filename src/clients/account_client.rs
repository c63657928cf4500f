//! # Account Client
//!
//! Typed access to one account actor (users or admins). Wallet movements are sent as
//! actions, so each one is checked and applied inside a single actor message.

use crate::account_actor::{AccountAction, AccountActionResult, AccountError};
use crate::model::{Account, AccountCreate, AccountId, AccountUpdate, EntryTags, Rupees, WalletTransaction};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with an Account actor.
#[derive(Clone, Debug)]
pub struct AccountClient {
    inner: ResourceClient<Account>,
}

impl AccountClient {
    pub fn new(inner: ResourceClient<Account>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Account> for AccountClient {
    type Error = AccountError;

    fn inner(&self) -> &ResourceClient<Account> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.into_entity_error::<AccountError>() {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => AccountError::NotFound(AccountId(id)),
            Err(FrameworkError::AlreadyExists(id)) => AccountError::AlreadyExists(id),
            Err(other) => AccountError::ActorCommunicationError(other.to_string()),
        }
    }
}

fn unexpected(result: AccountActionResult) -> AccountError {
    AccountError::ActorCommunicationError(format!("unexpected action result: {:?}", result))
}

impl AccountClient {
    #[instrument(skip(self, params), fields(id = %params.id, role = %params.role))]
    pub async fn open_account(&self, params: AccountCreate) -> Result<AccountId, AccountError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    /// Fetches an account that must exist.
    pub async fn require(&self, id: &AccountId) -> Result<Account, AccountError> {
        self.get(id.clone())
            .await?
            .ok_or_else(|| AccountError::NotFound(id.clone()))
    }

    pub async fn balance(&self, id: &AccountId) -> Result<Rupees, AccountError> {
        Ok(self.require(id).await?.wallet_balance)
    }

    /// Case-insensitive lookup by email.
    #[instrument(skip(self))]
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AccountError> {
        let email = email.trim();
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|a| a.email.eq_ignore_ascii_case(email)))
    }

    #[instrument(skip(self))]
    pub async fn update_profile(&self, id: AccountId, update: AccountUpdate) -> Result<Account, AccountError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    #[instrument(skip(self, description, tags))]
    pub async fn credit(
        &self,
        id: AccountId,
        amount: Rupees,
        description: impl Into<String> + Send,
        tags: EntryTags,
    ) -> Result<WalletTransaction, AccountError> {
        let action = AccountAction::Credit {
            amount,
            description: description.into(),
            tags,
        };
        match self.inner.perform_action(id, action).await.map_err(Self::map_error)? {
            AccountActionResult::Credit(entry) => Ok(entry),
            other => Err(unexpected(other)),
        }
    }

    /// # Errors
    /// `InsufficientFunds` when the balance does not cover `amount`; nothing changes.
    #[instrument(skip(self, description, tags))]
    pub async fn debit(
        &self,
        id: AccountId,
        amount: Rupees,
        description: impl Into<String> + Send,
        tags: EntryTags,
    ) -> Result<WalletTransaction, AccountError> {
        let action = AccountAction::Debit {
            amount,
            description: description.into(),
            tags,
        };
        match self.inner.perform_action(id, action).await.map_err(Self::map_error)? {
            AccountActionResult::Debit(entry) => Ok(entry),
            other => Err(unexpected(other)),
        }
    }

    /// Most recent entries first; `None` uses the configured default limit.
    #[instrument(skip(self))]
    pub async fn history(&self, id: AccountId, limit: Option<usize>) -> Result<Vec<WalletTransaction>, AccountError> {
        match self
            .inner
            .perform_action(id, AccountAction::History { limit })
            .await
            .map_err(Self::map_error)?
        {
            AccountActionResult::History(entries) => Ok(entries),
            other => Err(unexpected(other)),
        }
    }

    /// Stops the actor, returning how many accounts it held.
    pub async fn shutdown(&self) -> usize {
        self.inner.shutdown().await
    }
}
