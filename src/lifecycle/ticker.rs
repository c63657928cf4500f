//! Simulated delivery progress.

use crate::clients::OrderClient;
use crate::model::{OrderId, OrderStatus};
use crate::order_actor::OrderError;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Advances `order_id` one status step every `every` until it is delivered.
///
/// Stops early, without error, if the order is cancelled in the meantime. The task
/// resolves to the status the order was left in.
pub fn spawn_status_ticker(
    orders: OrderClient,
    order_id: OrderId,
    every: Duration,
) -> JoinHandle<Result<OrderStatus, OrderError>> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        // the first tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            match orders.advance(order_id.clone()).await {
                Ok(status) if status.is_terminal() => {
                    info!(order = %order_id, %status, "Status ticker finished");
                    return Ok(status);
                }
                Ok(status) => debug!(order = %order_id, %status, "Order advanced"),
                Err(OrderError::InvalidTransition { from, .. }) => {
                    info!(order = %order_id, status = %from, "Order left the delivery path, ticker stopped");
                    return Ok(from);
                }
                Err(e) => {
                    warn!(order = %order_id, error = %e, "Status ticker stopped");
                    return Err(e);
                }
            }
        }
    })
}
