//! ActorEntity implementation for [`Product`].

use super::actions::{ProductAction, ProductActionResult};
use super::ProductError;
use crate::model::{Product, ProductCreate, ProductId, ProductStatus, ProductUpdate};
use crate::store::StoreHandle;
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

/// Dependencies injected into the product actor.
#[derive(Clone)]
pub struct ProductContext {
    pub store: StoreHandle,
}

impl Product {
    fn validate(&self) -> Result<(), ProductError> {
        if self.name.trim().is_empty() {
            return Err(ProductError::Validation("name must not be empty".into()));
        }
        if self.category.trim().is_empty() {
            return Err(ProductError::Validation("category must not be empty".into()));
        }
        if self.price.is_zero() {
            return Err(ProductError::Validation(format!("'{}' needs a price", self.name)));
        }
        Ok(())
    }
}

#[async_trait]
impl ActorEntity for Product {
    type Id = ProductId;
    type Create = ProductCreate;
    type Update = ProductUpdate;
    type Action = ProductAction;
    type ActionResult = ProductActionResult;
    type Context = ProductContext;
    type Error = ProductError;

    fn id(&self) -> &ProductId {
        &self.id
    }

    /// New products start active.
    fn from_create_params(id: ProductId, params: ProductCreate) -> Result<Self, ProductError> {
        let product = Product {
            id,
            name: params.name.trim().to_string(),
            price: params.price,
            category: params.category.trim().to_lowercase(),
            description: params.description,
            image: params.image,
            status: ProductStatus::Active,
            stock: params.stock,
            created_at: Utc::now(),
        };
        product.validate()?;
        Ok(product)
    }

    async fn on_create(&mut self, ctx: &ProductContext) -> Result<(), ProductError> {
        ctx.store.save_product(self).await?;
        info!(id = %self.id, name = %self.name, price = %self.price, "Product added");
        Ok(())
    }

    /// Handles updates to the Product entity.
    ///
    /// # Fields Updated
    /// - `name`, `price`, `category`, `description`, `image`, `stock`
    async fn on_update(&mut self, update: ProductUpdate, ctx: &ProductContext) -> Result<(), ProductError> {
        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(category) = update.category {
            self.category = category.trim().to_lowercase();
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(image) = update.image {
            self.image = Some(image);
        }
        if let Some(stock) = update.stock {
            self.stock = stock;
        }
        self.validate()?;
        ctx.store.save_product(self).await?;
        Ok(())
    }

    async fn on_delete(&self, ctx: &ProductContext) -> Result<(), ProductError> {
        ctx.store.remove_product(self.id).await?;
        info!(id = %self.id, "Product removed");
        Ok(())
    }

    /// Handles custom actions for the Product entity.
    ///
    /// # Actions
    /// - `SetStatus`: activates or deactivates the product
    /// - `Restock`: increments stock, returns the new level
    async fn handle_action(
        &mut self,
        action: ProductAction,
        ctx: &ProductContext,
    ) -> Result<ProductActionResult, ProductError> {
        let result = match action {
            ProductAction::SetStatus(status) => {
                self.status = status;
                ProductActionResult::SetStatus(status)
            }
            ProductAction::Restock(0) => return Err(ProductError::InvalidQuantity(0)),
            ProductAction::Restock(quantity) => {
                self.stock = self.stock.saturating_add(quantity);
                ProductActionResult::Restock(self.stock)
            }
        };
        ctx.store.save_product(self).await?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rupees;

    fn params(name: &str, price: u64) -> ProductCreate {
        ProductCreate {
            name: name.into(),
            price: Rupees(price),
            category: "Curry".into(),
            description: String::new(),
            image: None,
            stock: 10,
        }
    }

    #[test]
    fn test_new_products_are_active_with_normalized_category() {
        let product = Product::from_create_params(ProductId(4), params(" Dal Tadka ", 149)).unwrap();
        assert!(product.is_active());
        assert_eq!(product.name, "Dal Tadka");
        assert_eq!(product.category, "curry");
    }

    #[test]
    fn test_rejects_missing_name_or_price() {
        assert!(matches!(
            Product::from_create_params(ProductId(1), params("", 100)),
            Err(ProductError::Validation(_))
        ));
        assert!(matches!(
            Product::from_create_params(ProductId(1), params("Lassi", 0)),
            Err(ProductError::Validation(_))
        ));
    }
}
