//! # KalingaMart
//!
//! > **The storefront core of a regional food-delivery shop.**
//!
//! Customers browse a small menu, fill a cart, apply a discount code and check out with
//! cash, card or their in-app wallet. An admin tops up customer wallets from the admin
//! wallet, manages the menu and discount codes, and moves orders through their lifecycle.
//!
//! ## 🏗️ Design
//!
//! Every resource lives in its own actor (see the `actor-framework` crate):
//!
//! | Actor | Entity | Id |
//! |-------|--------|----|
//! | users, admins | [`Account`](model::Account) with its wallet ledger | `AccountId` |
//! | orders | [`Order`](model::Order) | `KM<millis>` |
//! | products | [`Product`](model::Product) | counter |
//! | discount codes | [`DiscountCode`](model::DiscountCode) | the upper-cased code |
//!
//! A wallet movement is a single actor message: the balance check, the balance change
//! and the ledger entry happen together, and the entry is persisted before the message
//! is answered. If persisting fails the account rolls back, so the balance always equals
//! the sum of its ledger.
//!
//! Work that spans actors (an admin transfer, a checkout) lives in [`services`] and
//! compensates explicitly when its second step fails.
//!
//! ## 🗺️ Module Tour
//!
//! - [`model`]: plain data (accounts, wallet entries, orders, products, codes, carts).
//! - [`pricing`]: delivery fee, discount and wallet arithmetic.
//! - [`account_actor`], [`order_actor`], [`product_actor`], [`discount_actor`]: the
//!   `ActorEntity` implementations.
//! - [`clients`]: typed wrappers over each actor.
//! - [`services`]: admin transfer and checkout.
//! - [`store`]: persistence adapters (in-memory, JSON files, document database).
//! - [`session`]: the customer [`ShopSession`](session::ShopSession) and the
//!   [`AdminConsole`](session::AdminConsole).
//! - [`lifecycle`]: starting, seeding and stopping the whole [`Storefront`](lifecycle::Storefront).
//! - [`config`]: TOML and environment configuration.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Run the demo with info logs
//! RUST_LOG=info cargo run
//!
//! # Keep state between runs
//! KALINGAMART_BACKEND=local KALINGAMART_DATA_DIR=./data cargo run
//! ```

pub mod account_actor;
pub mod clients;
pub mod config;
pub mod discount_actor;
pub mod error;
pub mod ids;
pub mod lifecycle;
pub mod model;
pub mod order_actor;
pub mod pricing;
pub mod product_actor;
pub mod services;
pub mod session;
pub mod store;

pub use error::{ErrorKind, StorefrontError};
