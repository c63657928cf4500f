//! # ActorEntity Trait
//!
//! The `ActorEntity` trait is the contract every resource (accounts, orders, products,
//! discount codes) implements to be managed by the generic `ResourceActor`. It names the
//! id, payload, action and error types, and provides the lifecycle hooks the actor calls
//! while it owns the entity.
//!
//! # Provided Methods (Hooks)
//! - [`ActorEntity::assigned_id`] lets an entity pick its own id from the create payload.
//! - [`ActorEntity::on_create`] and [`ActorEntity::on_delete`] default to `Ok(())`.
//!
//! # Rollback
//! Hooks may mutate `self` freely. When a hook returns `Err`, the actor restores the
//! entity to the value it had before the message was processed.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any resource entity must implement to be managed by ResourceActor.
///
/// # Async & Context
/// Hooks are `#[async_trait]` so they can await persistence or other actors. The
/// `Context` is handed to [`ResourceActor::run`](crate::ResourceActor::run) and passed to
/// every hook, so dependencies are bound when the actor starts rather than when it is
/// constructed.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The unique identifier for this entity.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;

    /// The data required to create a new instance.
    type Create: Send + Sync + Debug;

    /// The data required to update an existing instance.
    type Update: Send + Sync + Debug;

    /// Enum representing resource-specific operations (e.g. `Debit`).
    type Action: Send + Sync + Debug;

    /// The result type returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// The error type for this entity.
    ///
    /// One enum per actor rather than one per message. Clients get it back through
    /// [`FrameworkError::into_entity_error`](crate::FrameworkError::into_entity_error).
    type Error: std::error::Error + Send + Sync + 'static;

    /// The current id of this entity, used when seeding an actor with restored state.
    fn id(&self) -> &Self::Id;

    /// Id chosen by the payload itself (natural keys such as an account id or a
    /// discount code). `None` falls back to the actor's id generator.
    fn assigned_id(_params: &Self::Create) -> Option<Self::Id> {
        None
    }

    /// Construct the full entity from the id and payload.
    /// This is called synchronously before `on_create`.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    // --- Lifecycle Hooks (Async) ---

    /// Called after the entity is constructed and before it is stored.
    /// An error here discards the entity.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called when an update request is received.
    async fn on_update(
        &mut self,
        update: Self::Update,
        ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called immediately before the entity is removed from the store.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Action Handler (Async) ---

    /// Handle a custom resource-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
