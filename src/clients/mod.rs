//! Type-safe wrappers around [`ResourceClient`](actor_framework::ResourceClient).

pub mod account_client;
pub mod discount_client;
pub mod order_client;
pub mod product_client;

pub use account_client::*;
pub use actor_framework::ActorClient;
pub use discount_client::*;
pub use order_client::*;
pub use product_client::*;
