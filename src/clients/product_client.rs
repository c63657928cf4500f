//! # Product Client
//!
//! Provides a high‑level API for interacting with the `Product` actor.
//! It wraps a `ResourceClient<Product>` and exposes domain‑specific methods.
use crate::model::{Product, ProductCreate, ProductId, ProductStatus, ProductUpdate};
use crate::product_actor::{ProductAction, ProductActionResult, ProductError};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the Product actor.
#[derive(Clone, Debug)]
pub struct ProductClient {
    inner: ResourceClient<Product>,
}

impl ProductClient {
    pub fn new(inner: ResourceClient<Product>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Product> for ProductClient {
    type Error = ProductError;

    fn inner(&self) -> &ResourceClient<Product> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.into_entity_error::<ProductError>() {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => ProductError::NotFound(id),
            Err(FrameworkError::AlreadyExists(id)) => ProductError::AlreadyExists(id),
            Err(other) => ProductError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl ProductClient {
    #[instrument(skip(self))]
    pub async fn add_product(&self, params: ProductCreate) -> Result<ProductId, ProductError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_product(&self, id: ProductId, update: ProductUpdate) -> Result<Product, ProductError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    pub async fn require(&self, id: ProductId) -> Result<Product, ProductError> {
        self.get(id)
            .await?
            .ok_or_else(|| ProductError::NotFound(id.to_string()))
    }

    /// Shows or hides a product on the customer menu.
    #[instrument(skip(self))]
    pub async fn set_status(&self, id: ProductId, status: ProductStatus) -> Result<ProductStatus, ProductError> {
        match self
            .inner
            .perform_action(id, ProductAction::SetStatus(status))
            .await
            .map_err(Self::map_error)?
        {
            ProductActionResult::SetStatus(status) => Ok(status),
            other => Err(ProductError::ActorCommunicationError(format!(
                "SetStatus answered with {:?}",
                other
            ))),
        }
    }

    /// Adds stock and returns the new level.
    #[instrument(skip(self))]
    pub async fn restock(&self, id: ProductId, quantity: u32) -> Result<u32, ProductError> {
        match self
            .inner
            .perform_action(id, ProductAction::Restock(quantity))
            .await
            .map_err(Self::map_error)?
        {
            ProductActionResult::Restock(level) => Ok(level),
            other => Err(ProductError::ActorCommunicationError(format!(
                "Restock answered with {:?}",
                other
            ))),
        }
    }

    /// Every product ordered by id, inactive ones included.
    pub async fn catalog(&self) -> Result<Vec<Product>, ProductError> {
        let mut products = self.list().await?;
        products.sort_by_key(|p| p.id);
        Ok(products)
    }

    /// What customers see: active products only.
    pub async fn menu(&self) -> Result<Vec<Product>, ProductError> {
        let mut products = self.catalog().await?;
        products.retain(Product::is_active);
        Ok(products)
    }

    /// Stops the actor, returning how many products it held.
    pub async fn shutdown(&self) -> usize {
        self.inner.shutdown().await
    }
}
