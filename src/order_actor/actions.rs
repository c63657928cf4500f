//! Status actions for the Order actor.

use crate::model::OrderStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    /// Moves to the given status. Writing the current status is a no-op.
    SetStatus(OrderStatus),
    /// One step forward along the delivery path.
    Advance,
    /// Cancels a non-terminal order.
    Cancel,
}

/// Results from OrderActions - each carries the status after the action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderActionResult {
    SetStatus(OrderStatus),
    Advance(OrderStatus),
    Cancel(OrderStatus),
}

impl OrderActionResult {
    pub fn status(self) -> OrderStatus {
        match self {
            OrderActionResult::SetStatus(s)
            | OrderActionResult::Advance(s)
            | OrderActionResult::Cancel(s) => s,
        }
    }
}
