//! Order-specific resource logic: placement and the status lifecycle.

mod actions;
pub mod entity;
mod error;

pub use actions::*;
pub use entity::OrderContext;
pub use error::*;

use crate::clients::OrderClient;
use crate::ids::MonotonicMillis;
use crate::model::{Order, OrderId};
use actor_framework::ResourceActor;

/// Creates a new Order actor and its client.
///
/// Ids are `KM<millis>` drawn from `clock`; pass a clock started after the newest
/// restored order so new ids never collide with persisted ones.
pub fn new(buffer_size: usize, clock: MonotonicMillis) -> (ResourceActor<Order>, OrderClient) {
    let next_order_id = move || OrderId::from_millis(clock.next());
    let (actor, generic_client) = ResourceActor::with_id_generator(buffer_size, next_order_id);
    (actor, OrderClient::new(generic_client))
}
