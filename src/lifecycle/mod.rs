//! # System Lifecycle & Orchestration
//!
//! [`Storefront`] is the conductor: it opens the configured store, restores every
//! collection, creates the actors (seeding them with restored entities), injects each
//! actor's context when it is spawned, and stops them all with explicit `Shutdown`
//! messages. Sessions hold client clones, so dropping clients alone would not stop the
//! actors.
//!
//! ```rust,no_run
//! use kalingamart::config::StorefrontConfig;
//! use kalingamart::lifecycle::Storefront;
//!
//! # async fn demo() -> Result<(), kalingamart::StorefrontError> {
//! let storefront = Storefront::open(StorefrontConfig::default()).await?;
//! let mut shop = storefront.shop();
//! shop.login("asha@example.com", "secret").await?;
//! storefront.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod seed;
mod storefront;
mod ticker;

pub use storefront::*;
pub use ticker::*;
