//! Account resource logic: profiles plus the wallet ledger.
//!
//! Users and the admin are the same entity type served by two actor instances, one per
//! role, each persisting to its own collections.

mod actions;
pub mod entity;
mod error;
mod ledger;

pub use actions::*;
pub use entity::AccountContext;
pub use error::*;

use crate::clients::AccountClient;
use crate::model::Account;
use actor_framework::ResourceActor;

/// Creates a new Account actor and its client. Accounts always carry their own id.
pub fn new(buffer_size: usize) -> (ResourceActor<Account>, AccountClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, AccountClient::new(generic_client))
}
