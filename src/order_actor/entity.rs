//! ActorEntity implementation for [`Order`].

use super::actions::{OrderAction, OrderActionResult};
use super::OrderError;
use crate::model::{checked_subtotal_of, Order, OrderCreate, OrderId, OrderStatus};
use crate::store::StoreHandle;
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

/// Dependencies injected into the order actor.
#[derive(Clone)]
pub struct OrderContext {
    pub store: StoreHandle,
}

impl Order {
    /// Moves the order to `target` if the lifecycle graph allows it.
    ///
    /// Terminal orders reject every request, including a repeat of their own status.
    /// Otherwise writing the current status changes nothing.
    pub fn transition(&mut self, target: OrderStatus) -> Result<OrderStatus, OrderError> {
        let invalid = OrderError::InvalidTransition {
            id: self.id.clone(),
            from: self.status,
            to: target,
        };
        if self.status.is_terminal() {
            return Err(invalid);
        }
        if self.status == target {
            return Ok(target);
        }
        if !self.status.can_transition_to(target) {
            return Err(invalid);
        }
        self.status = target;
        Ok(target)
    }
}

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Update = ();
    type Action = OrderAction;
    type ActionResult = OrderActionResult;
    type Context = OrderContext;
    type Error = OrderError;

    fn id(&self) -> &OrderId {
        &self.id
    }

    /// Builds a `pending` order from the checkout snapshot.
    ///
    /// # Errors
    /// `Validation` when there are no lines, a line has zero quantity, the address is
    /// incomplete, or the quoted figures do not recompute from the lines.
    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, OrderError> {
        if params.items.is_empty() {
            return Err(OrderError::Validation("order has no items".into()));
        }
        if let Some(line) = params.items.iter().find(|i| i.quantity == 0) {
            return Err(OrderError::Validation(format!(
                "'{}' has a zero quantity",
                line.name
            )));
        }
        if checked_subtotal_of(&params.items).is_none() {
            return Err(OrderError::Validation("order total is too large".into()));
        }
        let missing = params.address.missing_fields();
        if !missing.is_empty() {
            return Err(OrderError::Validation(format!(
                "delivery address is missing {}",
                missing.join(", ")
            )));
        }

        let created_at = Utc::now();
        let quote = params.quote;
        let order = Order {
            id,
            user_id: params.user_id,
            items: params.items,
            subtotal: quote.subtotal,
            delivery_fee: quote.delivery_fee,
            discount_code: quote.discount_code,
            discount_applied: quote.discount_applied,
            wallet_used: quote.wallet_used,
            total: quote.total,
            status: OrderStatus::Pending,
            payment_method: params.payment_method,
            address: params.address,
            created_at,
            date: created_at.date_naive(),
        };
        if !order.totals_reconcile() {
            return Err(OrderError::Validation(format!(
                "total {} does not match the items and adjustments",
                order.total
            )));
        }
        Ok(order)
    }

    async fn on_create(&mut self, ctx: &OrderContext) -> Result<(), OrderError> {
        ctx.store.save_order(self).await?;
        info!(id = %self.id, user = %self.user_id, total = %self.total, "Order placed");
        Ok(())
    }

    async fn on_update(&mut self, _update: (), _ctx: &OrderContext) -> Result<(), OrderError> {
        Err(OrderError::Immutable(self.id.clone()))
    }

    /// # Actions
    /// - `SetStatus`: any move the lifecycle graph allows.
    /// - `Advance`: the next forward step.
    /// - `Cancel`: straight to `cancelled`.
    ///
    /// A change is persisted before it is acknowledged.
    async fn handle_action(
        &mut self,
        action: OrderAction,
        ctx: &OrderContext,
    ) -> Result<OrderActionResult, OrderError> {
        let before = self.status;
        let target = match action {
            OrderAction::SetStatus(target) => target,
            OrderAction::Advance => self.status.next().ok_or(OrderError::InvalidTransition {
                id: self.id.clone(),
                from: before,
                to: before,
            })?,
            OrderAction::Cancel => OrderStatus::Cancelled,
        };
        let after = self.transition(target)?;
        if after != before {
            ctx.store.save_order(self).await?;
            info!(id = %self.id, from = %before, to = %after, "Order status changed");
        }
        Ok(match action {
            OrderAction::SetStatus(_) => OrderActionResult::SetStatus(after),
            OrderAction::Advance => OrderActionResult::Advance(after),
            OrderAction::Cancel => OrderActionResult::Cancel(after),
        })
    }
}
