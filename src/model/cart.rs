use crate::model::{AccountId, Product, ProductId, Rupees};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How long the "added to cart" banner stays visible.
pub const NOTIFICATION_TTL_SECS: i64 = 3;

/// Most units of one dish a single line may hold.
pub const MAX_LINE_QUANTITY: u32 = 99;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("You can order at most {max} of {name}")]
    QuantityLimit { name: String, max: u32 },

    #[error("Cart total is too large")]
    TotalTooLarge,
}

/// A line in the cart, and (copied) a line in an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Rupees,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub quantity: u32,
}

impl CartItem {
    pub fn line_total(&self) -> Rupees {
        self.price * self.quantity
    }

    pub fn checked_line_total(&self) -> Option<Rupees> {
        self.price.checked_mul(self.quantity)
    }
}

/// Sum of `price × quantity` over `items`.
pub fn subtotal_of(items: &[CartItem]) -> Rupees {
    items.iter().map(CartItem::line_total).sum()
}

/// Like [`subtotal_of`], but `None` when any line or the sum overflows.
pub fn checked_subtotal_of(items: &[CartItem]) -> Option<Rupees> {
    items
        .iter()
        .try_fold(Rupees::ZERO, |sum, item| sum.checked_add(item.checked_line_total()?))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartNotification {
    pub product_name: String,
    pub added_at: DateTime<Utc>,
}

/// One shopper's cart. Lives for the shopping session; cleared on checkout.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    pub owner: Option<AccountId>,
    items: Vec<CartItem>,
    notification: Option<CartNotification>,
}

impl Cart {
    pub fn for_owner(owner: AccountId, items: Vec<CartItem>) -> Self {
        Self {
            owner: Some(owner),
            items,
            notification: None,
        }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Adds `quantity` of `product`, merging with an existing line for the same product.
    /// Zero quantities are ignored. A line above [`MAX_LINE_QUANTITY`] or a subtotal that
    /// overflows is refused and leaves the cart as it was.
    pub fn add(&mut self, product: &Product, quantity: u32, now: DateTime<Utc>) -> Result<(), CartError> {
        if quantity == 0 {
            return Ok(());
        }
        let mut items = self.items.clone();
        match items.iter_mut().find(|i| i.product_id == product.id) {
            Some(line) => {
                line.quantity = line
                    .quantity
                    .checked_add(quantity)
                    .ok_or_else(|| quantity_limit(&line.name))?;
            }
            None => items.push(CartItem {
                product_id: product.id,
                name: product.name.clone(),
                price: product.price,
                image: product.image.clone(),
                quantity,
            }),
        }
        self.replace_items(items)?;
        self.notification = Some(CartNotification {
            product_name: product.name.clone(),
            added_at: now,
        });
        Ok(())
    }

    /// Returns whether a line was removed.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        self.items.len() != before
    }

    /// Sets the quantity of a line; zero removes it. Returns whether the line existed.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: u32) -> Result<bool, CartError> {
        if quantity == 0 {
            return Ok(self.remove(product_id));
        }
        let mut items = self.items.clone();
        match items.iter_mut().find(|i| i.product_id == product_id) {
            Some(line) => line.quantity = quantity,
            None => return Ok(false),
        }
        self.replace_items(items)?;
        Ok(true)
    }

    fn replace_items(&mut self, items: Vec<CartItem>) -> Result<(), CartError> {
        if let Some(line) = items.iter().find(|i| i.quantity > MAX_LINE_QUANTITY) {
            return Err(quantity_limit(&line.name));
        }
        if checked_subtotal_of(&items).is_none() {
            return Err(CartError::TotalTooLarge);
        }
        self.items = items;
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.notification = None;
    }

    pub fn subtotal(&self) -> Rupees {
        subtotal_of(&self.items)
    }

    pub fn item_count(&self) -> u32 {
        self.items.iter().fold(0, |n, i| n.saturating_add(i.quantity))
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The latest "item added" notification, if it is younger than the TTL at `now`.
    pub fn notification(&self, now: DateTime<Utc>) -> Option<&CartNotification> {
        self.notification
            .as_ref()
            .filter(|n| now - n.added_at < Duration::seconds(NOTIFICATION_TTL_SECS))
    }
}

fn quantity_limit(name: &str) -> CartError {
    CartError::QuantityLimit {
        name: name.to_string(),
        max: MAX_LINE_QUANTITY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProductStatus;

    fn product(id: u32, price: u64) -> Product {
        Product {
            id: ProductId(id),
            name: format!("Dish {}", id),
            price: Rupees(price),
            category: "curry".into(),
            description: String::new(),
            image: None,
            status: ProductStatus::Active,
            stock: 10,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_add_merges_lines_and_totals() {
        let now = Utc::now();
        let mut cart = Cart::default();
        cart.add(&product(1, 100), 1, now).unwrap();
        cart.add(&product(2, 25), 2, now).unwrap();
        cart.add(&product(1, 100), 2, now).unwrap();

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.items()[0].quantity, 3);
        assert_eq!(cart.subtotal(), Rupees(350));
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn test_update_quantity_zero_removes() {
        let now = Utc::now();
        let mut cart = Cart::default();
        cart.add(&product(1, 100), 1, now).unwrap();

        assert!(cart.update_quantity(ProductId(1), 4).unwrap());
        assert_eq!(cart.subtotal(), Rupees(400));
        assert!(cart.update_quantity(ProductId(1), 0).unwrap());
        assert!(cart.is_empty());
        assert!(!cart.update_quantity(ProductId(9), 1).unwrap());
    }

    #[test]
    fn test_notification_expires() {
        let now = Utc::now();
        let mut cart = Cart::default();
        cart.add(&product(1, 100), 1, now).unwrap();

        let shown = cart.notification(now + Duration::seconds(2)).unwrap();
        assert_eq!(shown.product_name, "Dish 1");
        assert!(cart.notification(now + Duration::seconds(3)).is_none());
    }

    #[test]
    fn test_oversized_lines_are_refused_unchanged() {
        let now = Utc::now();
        let mut cart = Cart::default();
        cart.add(&product(1, 100), u32::MAX, now).unwrap_err();
        assert!(cart.is_empty());

        cart.add(&product(1, 100), MAX_LINE_QUANTITY, now).unwrap();
        assert_eq!(
            cart.add(&product(1, 100), 1, now),
            Err(CartError::QuantityLimit { name: "Dish 1".into(), max: MAX_LINE_QUANTITY })
        );
        assert!(cart.update_quantity(ProductId(1), MAX_LINE_QUANTITY + 1).is_err());
        assert_eq!(cart.item_count(), MAX_LINE_QUANTITY);
        assert_eq!(cart.subtotal(), Rupees(100) * MAX_LINE_QUANTITY);
    }

    #[test]
    fn test_subtotal_overflow_is_refused() {
        let now = Utc::now();
        let mut cart = Cart::default();
        cart.add(&product(1, u64::MAX / 2), 1, now).unwrap();
        assert_eq!(cart.add(&product(2, u64::MAX / 2), 2, now), Err(CartError::TotalTooLarge));
        assert_eq!(cart.items().len(), 1);
        assert_eq!(checked_subtotal_of(cart.items()), Some(Rupees(u64::MAX / 2)));

        let mut lines = cart.items().to_vec();
        lines[0].quantity = 3;
        assert_eq!(checked_subtotal_of(&lines), None);
    }
}
