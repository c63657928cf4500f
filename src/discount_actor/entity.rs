//! ActorEntity implementation for [`DiscountCode`].

use super::actions::{DiscountAction, DiscountActionResult};
use super::DiscountError;
use crate::model::{normalize_code, AppliedDiscount, DiscountCode, DiscountCreate, DiscountUpdate};
use crate::store::StoreHandle;
use actor_framework::ActorEntity;
use async_trait::async_trait;
use tracing::info;

/// Dependencies injected into the discount actor.
#[derive(Clone)]
pub struct DiscountContext {
    pub store: StoreHandle,
}

impl DiscountCode {
    /// What applying this code is worth, if it is active.
    pub fn apply(&self) -> Result<AppliedDiscount, DiscountError> {
        if !self.active {
            return Err(DiscountError::Inactive(self.code.clone()));
        }
        Ok(AppliedDiscount {
            code: self.code.clone(),
            amount: self.amount,
            description: self.description.clone(),
        })
    }
}

#[async_trait]
impl ActorEntity for DiscountCode {
    type Id = String;
    type Create = DiscountCreate;
    type Update = DiscountUpdate;
    type Action = DiscountAction;
    type ActionResult = DiscountActionResult;
    type Context = DiscountContext;
    type Error = DiscountError;

    fn id(&self) -> &String {
        &self.code
    }

    fn assigned_id(params: &DiscountCreate) -> Option<String> {
        Some(normalize_code(&params.code))
    }

    fn from_create_params(code: String, params: DiscountCreate) -> Result<Self, DiscountError> {
        if code.is_empty() {
            return Err(DiscountError::Validation("code must not be empty".into()));
        }
        if params.amount.is_zero() {
            return Err(DiscountError::Validation(format!("{} needs an amount", code)));
        }
        Ok(DiscountCode {
            code,
            amount: params.amount,
            description: params.description,
            active: params.active,
            usage_count: 0,
        })
    }

    async fn on_create(&mut self, ctx: &DiscountContext) -> Result<(), DiscountError> {
        ctx.store.save_discount_code(self).await?;
        info!(code = %self.code, amount = %self.amount, active = self.active, "Discount code added");
        Ok(())
    }

    async fn on_update(&mut self, update: DiscountUpdate, ctx: &DiscountContext) -> Result<(), DiscountError> {
        if let Some(amount) = update.amount {
            if amount.is_zero() {
                return Err(DiscountError::Validation(format!("{} needs an amount", self.code)));
            }
            self.amount = amount;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        ctx.store.save_discount_code(self).await?;
        Ok(())
    }

    async fn on_delete(&self, ctx: &DiscountContext) -> Result<(), DiscountError> {
        ctx.store.remove_discount_code(&self.code).await?;
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: DiscountAction,
        ctx: &DiscountContext,
    ) -> Result<DiscountActionResult, DiscountError> {
        match action {
            DiscountAction::Apply => Ok(DiscountActionResult::Apply(self.apply()?)),
            DiscountAction::RecordUsage => {
                self.usage_count = self.usage_count.saturating_add(1);
                ctx.store.save_discount_code(self).await?;
                Ok(DiscountActionResult::RecordUsage(self.usage_count))
            }
            DiscountAction::Toggle => {
                self.active = !self.active;
                ctx.store.save_discount_code(self).await?;
                info!(code = %self.code, active = self.active, "Discount code toggled");
                Ok(DiscountActionResult::Toggle(self.active))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rupees;

    fn create(code: &str, amount: u64, active: bool) -> DiscountCreate {
        DiscountCreate {
            code: code.into(),
            amount: Rupees(amount),
            description: String::new(),
            active,
        }
    }

    #[test]
    fn test_assigned_id_is_normalized() {
        assert_eq!(
            DiscountCode::assigned_id(&create(" save20 ", 20, true)),
            Some("SAVE20".to_string())
        );
    }

    #[test]
    fn test_inactive_codes_never_apply() {
        let code = DiscountCode::from_create_params("SAVE50".into(), create("SAVE50", 50, false)).unwrap();
        assert!(matches!(code.apply(), Err(DiscountError::Inactive(c)) if c == "SAVE50"));

        let code = DiscountCode::from_create_params("NEWUSER".into(), create("NEWUSER", 10, true)).unwrap();
        assert_eq!(code.apply().unwrap().amount, Rupees(10));
    }

    #[test]
    fn test_zero_amount_rejected() {
        assert!(matches!(
            DiscountCode::from_create_params("FREE".into(), create("FREE", 0, true)),
            Err(DiscountError::Validation(_))
        ));
    }
}
