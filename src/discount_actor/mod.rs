//! Discount engine: fixed-amount promo codes keyed by their normalized code.

mod actions;
pub mod entity;
mod error;

pub use actions::*;
pub use entity::DiscountContext;
pub use error::*;

use crate::clients::DiscountClient;
use crate::model::DiscountCode;
use actor_framework::ResourceActor;

/// Creates a new Discount actor and its client. Codes are their own ids.
pub fn new(buffer_size: usize) -> (ResourceActor<DiscountCode>, DiscountClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, DiscountClient::new(generic_client))
}
