//! # Discount Client
//!
//! Codes are looked up case-insensitively: every method normalizes the code before it
//! reaches the actor.

use crate::discount_actor::{DiscountAction, DiscountActionResult, DiscountError};
use crate::model::{normalize_code, AppliedDiscount, DiscountCode, DiscountCreate, DiscountUpdate};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument};

#[derive(Clone, Debug)]
pub struct DiscountClient {
    inner: ResourceClient<DiscountCode>,
}

impl DiscountClient {
    pub fn new(inner: ResourceClient<DiscountCode>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<DiscountCode> for DiscountClient {
    type Error = DiscountError;

    fn inner(&self) -> &ResourceClient<DiscountCode> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.into_entity_error::<DiscountError>() {
            Ok(err) => err,
            Err(FrameworkError::NotFound(code)) => DiscountError::NotFound(code),
            Err(FrameworkError::AlreadyExists(code)) => DiscountError::AlreadyExists(code),
            Err(other) => DiscountError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl DiscountClient {
    #[instrument(skip(self))]
    pub async fn add_code(&self, params: DiscountCreate) -> Result<String, DiscountError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_code(&self, code: &str, update: DiscountUpdate) -> Result<DiscountCode, DiscountError> {
        self.inner
            .update(normalize_code(code), update)
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn remove_code(&self, code: &str) -> Result<(), DiscountError> {
        self.delete(normalize_code(code)).await
    }

    /// Validates `code` for the current checkout.
    ///
    /// # Errors
    /// `NotFound` for unknown codes, `Inactive` for disabled ones.
    #[instrument(skip(self))]
    pub async fn apply(&self, code: &str) -> Result<AppliedDiscount, DiscountError> {
        match self.act(code, DiscountAction::Apply).await? {
            DiscountActionResult::Apply(applied) => Ok(applied),
            other => Err(unexpected(other)),
        }
    }

    /// Counts one order placed with `code`; returns the new usage count.
    #[instrument(skip(self))]
    pub async fn record_usage(&self, code: &str) -> Result<u32, DiscountError> {
        match self.act(code, DiscountAction::RecordUsage).await? {
            DiscountActionResult::RecordUsage(count) => Ok(count),
            other => Err(unexpected(other)),
        }
    }

    /// Flips the active flag; returns whether the code is now active.
    #[instrument(skip(self))]
    pub async fn toggle(&self, code: &str) -> Result<bool, DiscountError> {
        match self.act(code, DiscountAction::Toggle).await? {
            DiscountActionResult::Toggle(active) => Ok(active),
            other => Err(unexpected(other)),
        }
    }

    async fn act(&self, code: &str, action: DiscountAction) -> Result<DiscountActionResult, DiscountError> {
        let code = normalize_code(code);
        if code.is_empty() {
            return Err(DiscountError::Validation("enter a discount code".into()));
        }
        self.inner
            .perform_action(code, action)
            .await
            .map_err(Self::map_error)
    }

    /// All codes, alphabetical.
    pub async fn codes(&self) -> Result<Vec<DiscountCode>, DiscountError> {
        let mut codes = self.list().await?;
        codes.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(codes)
    }

    /// Stops the actor, returning how many codes it held.
    pub async fn shutdown(&self) -> usize {
        self.inner.shutdown().await
    }
}

fn unexpected(result: DiscountActionResult) -> DiscountError {
    DiscountError::ActorCommunicationError(format!("unexpected action result: {:?}", result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rupees;
    use actor_framework::mock::MockClient;

    #[tokio::test]
    async fn test_apply_normalizes_code() {
        let mut mock = MockClient::<DiscountCode>::new();
        mock.expect_action("NEWUSER".to_string())
            .return_ok(DiscountActionResult::Apply(AppliedDiscount {
                code: "NEWUSER".into(),
                amount: Rupees(10),
                description: "New user discount".into(),
            }));

        let discounts = DiscountClient::new(mock.client());
        let applied = discounts.apply("  newuser ").await.unwrap();
        assert_eq!(applied.amount, Rupees(10));
        assert_eq!(mock.recorded(), vec!["Action NEWUSER Apply".to_string()]);
    }

    #[tokio::test]
    async fn test_unknown_code_is_not_found() {
        let mut mock = MockClient::<DiscountCode>::new();
        mock.expect_action("BOGUS".to_string())
            .return_err(FrameworkError::NotFound("BOGUS".into()));

        let discounts = DiscountClient::new(mock.client());
        assert!(matches!(
            discounts.apply("bogus").await,
            Err(DiscountError::NotFound(code)) if code == "BOGUS"
        ));
    }

    #[tokio::test]
    async fn test_blank_code_never_reaches_actor() {
        let mock = MockClient::<DiscountCode>::new();
        let discounts = DiscountClient::new(mock.client());
        assert!(matches!(discounts.apply("   ").await, Err(DiscountError::Validation(_))));
        assert!(mock.recorded().is_empty());
    }
}
