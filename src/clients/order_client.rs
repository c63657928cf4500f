use crate::model::{AccountId, Order, OrderCreate, OrderId, OrderStatus};
use crate::order_actor::{OrderAction, OrderActionResult, OrderError};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, info, instrument};

/// Client for interacting with the Order actor.
///
/// Orders are immutable once placed apart from their status, which only moves along the
/// lifecycle graph enforced in the actor.
#[derive(Clone, Debug)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, params), fields(user = %params.user_id, total = %params.quote.total))]
    pub async fn place_order(&self, params: OrderCreate) -> Result<OrderId, OrderError> {
        info!("Sending place_order to actor");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    pub async fn require(&self, id: &OrderId) -> Result<Order, OrderError> {
        self.get(id.clone())
            .await?
            .ok_or_else(|| OrderError::NotFound(id.clone()))
    }

    #[instrument(skip(self))]
    pub async fn set_status(&self, id: OrderId, status: OrderStatus) -> Result<OrderStatus, OrderError> {
        self.act(id, OrderAction::SetStatus(status)).await
    }

    /// Moves the order one step along the delivery path.
    #[instrument(skip(self))]
    pub async fn advance(&self, id: OrderId) -> Result<OrderStatus, OrderError> {
        self.act(id, OrderAction::Advance).await
    }

    #[instrument(skip(self))]
    pub async fn cancel(&self, id: OrderId) -> Result<OrderStatus, OrderError> {
        self.act(id, OrderAction::Cancel).await
    }

    async fn act(&self, id: OrderId, action: OrderAction) -> Result<OrderStatus, OrderError> {
        debug!("Sending request");
        let result = self
            .inner
            .perform_action(id, action)
            .await
            .map_err(Self::map_error)?;
        Ok(result.status())
    }

    /// Every order, newest first.
    pub async fn all_orders(&self) -> Result<Vec<Order>, OrderError> {
        let mut orders = self.list().await?;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(orders)
    }

    /// One customer's orders, newest first.
    #[instrument(skip(self))]
    pub async fn orders_for_user(&self, user_id: &AccountId) -> Result<Vec<Order>, OrderError> {
        let mut orders = self.all_orders().await?;
        orders.retain(|o| &o.user_id == user_id);
        Ok(orders)
    }

    /// Stops the actor, returning how many orders it held.
    pub async fn shutdown(&self) -> usize {
        self.inner.shutdown().await
    }
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.into_entity_error::<OrderError>() {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => OrderError::NotFound(OrderId(id)),
            Err(FrameworkError::AlreadyExists(id)) => OrderError::AlreadyExists(id),
            Err(other) => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actor_framework::mock::MockClient;

    #[tokio::test]
    async fn test_cancel_returns_new_status() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_action(OrderId::from("KM1"))
            .return_ok(OrderActionResult::Cancel(OrderStatus::Cancelled));

        let orders = OrderClient::new(mock.client());
        assert_eq!(
            orders.cancel(OrderId::from("KM1")).await.unwrap(),
            OrderStatus::Cancelled
        );
        assert_eq!(mock.recorded(), vec!["Action KM1 Cancel".to_string()]);
        mock.verify();
    }

    #[tokio::test]
    async fn test_invalid_transition_is_typed() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_action(OrderId::from("KM2")).return_err(FrameworkError::EntityError(Box::new(
            OrderError::InvalidTransition {
                id: OrderId::from("KM2"),
                from: OrderStatus::Delivered,
                to: OrderStatus::Pending,
            },
        )));

        let orders = OrderClient::new(mock.client());
        let err = orders
            .set_status(OrderId::from("KM2"), OrderStatus::Pending)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            OrderError::InvalidTransition { from: OrderStatus::Delivered, .. }
        ));
    }

    #[tokio::test]
    async fn test_missing_order() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_get(OrderId::from("KM9")).return_ok(None);

        let orders = OrderClient::new(mock.client());
        assert!(matches!(
            orders.require(&OrderId::from("KM9")).await,
            Err(OrderError::NotFound(id)) if id.0 == "KM9"
        ));
    }
}
