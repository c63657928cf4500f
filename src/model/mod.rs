//! Plain data types for the storefront. Behavior that needs an actor lives in the
//! matching `*_actor` module.

mod account;
mod cart;
mod discount;
mod money;
mod order;
mod product;
mod wallet;

pub use account::*;
pub use cart::*;
pub use discount::*;
pub use money::*;
pub use order::*;
pub use product::*;
pub use wallet::*;
