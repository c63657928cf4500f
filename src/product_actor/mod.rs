//! Product-specific resource logic: the menu catalog.

mod actions;
pub mod entity;
mod error;

pub use actions::*;
pub use entity::ProductContext;
pub use error::*;

use crate::clients::ProductClient;
use crate::model::{Product, ProductId};
use actor_framework::ResourceActor;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Creates a new Product actor and its client.
///
/// Ids are sequential starting at `first_id`, which should be one past the largest
/// restored id.
pub fn new(buffer_size: usize, first_id: u32) -> (ResourceActor<Product>, ProductClient) {
    let product_id_counter = Arc::new(AtomicU32::new(first_id.max(1)));
    let next_product_id = move || ProductId(product_id_counter.fetch_add(1, Ordering::SeqCst));

    let (actor, generic_client) = ResourceActor::with_id_generator(buffer_size, next_product_id);
    let client = ProductClient::new(generic_client);

    (actor, client)
}
