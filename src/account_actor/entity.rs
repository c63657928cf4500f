//! ActorEntity implementation for [`Account`].
//!
//! Every hook that changes state persists before returning. A persistence failure is
//! returned as an error, which makes the actor restore the pre-image, so the in-memory
//! balance never runs ahead of the stored one.

use super::actions::{AccountAction, AccountActionResult};
use super::AccountError;
use crate::model::{Account, AccountCreate, AccountId, AccountUpdate, EntryTags, Rupees};
use crate::store::StoreHandle;
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};

/// Dependencies injected into the account actor.
#[derive(Clone)]
pub struct AccountContext {
    pub store: StoreHandle,
    /// Default number of entries returned by `History { limit: None }`.
    pub history_limit: usize,
}

fn validate_profile(name: &str, email: &str) -> Result<(), AccountError> {
    if name.trim().is_empty() {
        return Err(AccountError::Validation("name must not be empty".into()));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(AccountError::Validation(format!("invalid email '{}'", email))),
    }
}

#[async_trait]
impl ActorEntity for Account {
    type Id = AccountId;
    type Create = AccountCreate;
    type Update = AccountUpdate;
    type Action = AccountAction;
    type ActionResult = AccountActionResult;
    type Context = AccountContext;
    type Error = AccountError;

    fn id(&self) -> &AccountId {
        &self.id
    }

    fn assigned_id(params: &AccountCreate) -> Option<AccountId> {
        Some(params.id.clone())
    }

    /// Builds the account with a zero balance, then posts the opening credit (if any)
    /// through the ledger so the balance starts out reconciled.
    fn from_create_params(id: AccountId, params: AccountCreate) -> Result<Self, AccountError> {
        validate_profile(&params.name, &params.email)?;
        let mut account = Account {
            id,
            role: params.role,
            name: params.name.trim().to_string(),
            email: params.email.trim().to_string(),
            phone: params.phone,
            wallet_balance: Rupees::ZERO,
            address: params.address,
            profile_picture: params.profile_picture,
            created_at: Utc::now(),
            ledger: Vec::new(),
        };
        if let Some(opening) = params.opening_credit {
            account.credit(opening.amount, opening.description, EntryTags::default())?;
        }
        Ok(account)
    }

    async fn on_create(&mut self, ctx: &AccountContext) -> Result<(), AccountError> {
        match self.ledger.last() {
            Some(opening) => ctx.store.commit_ledger_entry(self, opening).await?,
            None => ctx.store.save_account(self).await?,
        }
        info!(id = %self.id, role = %self.role, balance = %self.wallet_balance, "Account opened");
        Ok(())
    }

    async fn on_update(&mut self, update: AccountUpdate, ctx: &AccountContext) -> Result<(), AccountError> {
        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(email) = update.email {
            self.email = email.trim().to_string();
        }
        if let Some(phone) = update.phone {
            self.phone = Some(phone);
        }
        if let Some(address) = update.address {
            self.address = Some(address);
        }
        if let Some(picture) = update.profile_picture {
            self.profile_picture = Some(picture);
        }
        validate_profile(&self.name, &self.email)?;
        ctx.store.save_account(self).await?;
        Ok(())
    }

    async fn on_delete(&self, ctx: &AccountContext) -> Result<(), AccountError> {
        ctx.store.remove_account(self).await?;
        Ok(())
    }

    /// # Actions
    /// - `Credit` / `Debit`: post one ledger entry and persist it with the account.
    /// - `History`: most recent entries first.
    async fn handle_action(
        &mut self,
        action: AccountAction,
        ctx: &AccountContext,
    ) -> Result<AccountActionResult, AccountError> {
        match action {
            AccountAction::Credit {
                amount,
                description,
                tags,
            } => {
                let entry = self.credit(amount, description, tags)?;
                ctx.store.commit_ledger_entry(self, &entry).await?;
                debug!(id = %self.id, %amount, balance = %self.wallet_balance, "Credited");
                Ok(AccountActionResult::Credit(entry))
            }
            AccountAction::Debit {
                amount,
                description,
                tags,
            } => {
                let entry = self.debit(amount, description, tags)?;
                ctx.store.commit_ledger_entry(self, &entry).await?;
                debug!(id = %self.id, %amount, balance = %self.wallet_balance, "Debited");
                Ok(AccountActionResult::Debit(entry))
            }
            AccountAction::History { limit } => Ok(AccountActionResult::History(
                self.history(limit.unwrap_or(ctx.history_limit)),
            )),
        }
    }
}
