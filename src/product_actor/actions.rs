//! Custom actions for the Product actor.

use crate::model::ProductStatus;

/// Menu operations beyond plain field edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductAction {
    /// Shows or hides the product on the customer menu.
    SetStatus(ProductStatus),
    /// Adds units to the stock count.
    ///
    /// # Errors
    /// `InvalidQuantity` for zero.
    Restock(u32),
}

/// Results from ProductActions - variants match 1:1 with ProductAction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductActionResult {
    SetStatus(ProductStatus),
    /// The stock level after restocking.
    Restock(u32),
}
