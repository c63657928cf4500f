//! # Actor Framework
//!
//! Building blocks for type-safe, concurrent resource actors. Each resource type
//! (accounts, orders, products, discount codes) is owned by one [`ResourceActor`] task and
//! reached only through cloneable [`ResourceClient`] handles. This is a
//! **Resource-Oriented Architecture** on top of the **Actor Model**:
//!
//! - Uniform operations on every resource: Create, Get, List, Update, Delete, plus
//!   resource-specific **Actions**.
//! - Isolated state with no locks. Messages to one actor are processed one at a time, so a
//!   check-then-write inside a single message (debit only if the balance covers it) cannot
//!   race with another request against the same actor.
//! - Failed hooks roll the entity back to its pre-image, so a rejected action leaves no
//!   partial mutation behind.
//!
//! **Further Reading**:
//! - [Actors in Rust](https://ryhl.io/blog/actors-with-tokio/) - Practical guide to implementing actors with Tokio
//!
//! ## Layers
//!
//! 1. **Entity Layer** ([`ActorEntity`]) - domain state and its hooks
//! 2. **Runtime Layer** ([`ResourceActor`]) - message processing and the entity store
//! 3. **Interface Layer** ([`ResourceClient`], [`ActorClient`]) - typed requests
//!
//! ```rust
//! use actor_framework::{ActorEntity, ResourceActor};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)]
//! struct Counter { id: String, value: u64 }
//!
//! #[derive(Debug)] struct CounterCreate { id: String }
//! #[derive(Debug)] struct CounterUpdate;
//! #[derive(Debug)] enum CounterAction { Take(u64) }
//!
//! #[derive(Debug, thiserror::Error)]
//! #[error("only {0} left")]
//! struct NotEnough(u64);
//!
//! #[async_trait]
//! impl ActorEntity for Counter {
//!     type Id = String;
//!     type Create = CounterCreate;
//!     type Update = CounterUpdate;
//!     type Action = CounterAction;
//!     type ActionResult = u64;
//!     type Context = ();
//!     type Error = NotEnough;
//!
//!     fn id(&self) -> &String { &self.id }
//!     fn assigned_id(params: &CounterCreate) -> Option<String> { Some(params.id.clone()) }
//!     fn from_create_params(id: String, _: CounterCreate) -> Result<Self, NotEnough> {
//!         Ok(Self { id, value: 10 })
//!     }
//!     async fn on_update(&mut self, _: CounterUpdate, _: &()) -> Result<(), NotEnough> { Ok(()) }
//!     async fn handle_action(&mut self, action: CounterAction, _: &()) -> Result<u64, NotEnough> {
//!         let CounterAction::Take(n) = action;
//!         self.value = self.value.checked_sub(n).ok_or(NotEnough(self.value))?;
//!         Ok(self.value)
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = ResourceActor::<Counter>::new(10);
//!     tokio::spawn(actor.run(()));
//!
//!     let id = client.create(CounterCreate { id: "c1".into() }).await.unwrap();
//!     assert_eq!(client.perform_action(id.clone(), CounterAction::Take(4)).await.unwrap(), 6);
//!
//!     let err = client.perform_action(id.clone(), CounterAction::Take(7)).await.unwrap_err();
//!     assert_eq!(err.into_entity_error::<NotEnough>().unwrap().0, 6);
//!     assert_eq!(client.get(id).await.unwrap().unwrap().value, 6);
//! }
//! ```
//!
//! ## Context Injection
//!
//! Dependencies are handed to [`ResourceActor::run`], not to the constructor. Every actor
//! can be created first and wired afterwards, so two actors may hold each other's clients.
//!
//! ## Testing
//!
//! [`mock::MockClient`] answers a real `ResourceClient<T>` from scripted expectations, for
//! unit tests of code that coordinates several clients.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod tracing;

// Re-export core types for convenience
pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
