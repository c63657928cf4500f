use crate::model::{subtotal_of, AccountId, Address, CartItem, Rupees};
use crate::pricing::Quote;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Type-safe identifier for Orders: `KM` followed by the creation millisecond.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    pub const PREFIX: &'static str = "KM";

    pub fn from_millis(millis: u64) -> Self {
        Self(format!("{}{}", Self::PREFIX, millis))
    }
}

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// `pending → confirmed → preparing → out-for-delivery → delivered`, with `cancelled`
/// reachable from every non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    OutForDelivery,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// The next forward step, if any.
    pub fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Confirmed),
            OrderStatus::Confirmed => Some(OrderStatus::Preparing),
            OrderStatus::Preparing => Some(OrderStatus::OutForDelivery),
            OrderStatus::OutForDelivery => Some(OrderStatus::Delivered),
            OrderStatus::Delivered | OrderStatus::Cancelled => None,
        }
    }

    pub fn can_transition_to(self, target: OrderStatus) -> bool {
        if self.is_terminal() {
            return false;
        }
        target == OrderStatus::Cancelled || self.next() == Some(target)
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::OutForDelivery => "out-for-delivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        })
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "preparing" => Ok(OrderStatus::Preparing),
            "out-for-delivery" | "out_for_delivery" => Ok(OrderStatus::OutForDelivery),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status '{}'", other)),
        }
    }
}

/// How the order's remaining `total` is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "cod")]
    CashOnDelivery,
    #[serde(rename = "wallet")]
    Wallet,
}

/// Represents a customer order.
///
/// # Actor Framework
/// This struct implements the [`ActorEntity`](actor_framework::ActorEntity) trait,
/// allowing it to be managed by a [`ResourceActor`](actor_framework::ResourceActor).
///
/// See [`impl ActorEntity for Order`](#impl-ActorEntity-for-Order) for details on:
/// - Creation parameters ([`OrderCreate`])
/// - Status actions ([`OrderAction`](crate::order_actor::OrderAction))
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: AccountId,
    /// Snapshot of the cart at checkout; later cart edits never reach it.
    pub items: Vec<CartItem>,
    pub subtotal: Rupees,
    pub delivery_fee: Rupees,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_applied: Option<Rupees>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_used: Option<Rupees>,
    pub total: Rupees,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub address: Address,
    pub created_at: DateTime<Utc>,
    pub date: NaiveDate,
}

/// Payload for placing an order.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub user_id: AccountId,
    pub items: Vec<CartItem>,
    pub quote: Quote,
    pub payment_method: PaymentMethod,
    pub address: Address,
}

impl Order {
    /// `Σ price × quantity + delivery fee − discount − wallet`, or `None` if it would go
    /// below zero.
    pub fn recompute_total(&self) -> Option<Rupees> {
        (subtotal_of(&self.items) + self.delivery_fee)
            .checked_sub(self.discount_applied.unwrap_or_default())?
            .checked_sub(self.wallet_used.unwrap_or_default())
    }

    /// Whether the stored subtotal and total agree with the item snapshot.
    pub fn totals_reconcile(&self) -> bool {
        subtotal_of(&self.items) == self.subtotal && self.recompute_total() == Some(self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProductId;

    #[test]
    fn test_status_graph() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(!Pending.can_transition_to(Preparing));
        assert!(Preparing.can_transition_to(Cancelled));
        assert!(OutForDelivery.can_transition_to(Delivered));
        assert!(!Delivered.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Pending));
        assert!(!Delivered.can_transition_to(Pending));
        assert_eq!(Delivered.next(), None);
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::OutForDelivery).unwrap(),
            "\"out-for-delivery\""
        );
        assert_eq!("Out-For-Delivery".parse::<OrderStatus>(), Ok(OrderStatus::OutForDelivery));
        assert!("shipped".parse::<OrderStatus>().is_err());
        assert_eq!(
            serde_json::to_string(&PaymentMethod::CashOnDelivery).unwrap(),
            "\"cod\""
        );
    }

    #[test]
    fn test_recompute_total() {
        let now = Utc::now();
        let order = Order {
            id: OrderId::from_millis(1),
            user_id: AccountId::from("u"),
            items: vec![CartItem {
                product_id: ProductId(1),
                name: "Dal".into(),
                price: Rupees(75),
                image: None,
                quantity: 2,
            }],
            subtotal: Rupees(150),
            delivery_fee: Rupees(29),
            discount_code: Some("NEWUSER".into()),
            discount_applied: Some(Rupees(10)),
            wallet_used: None,
            total: Rupees(169),
            status: OrderStatus::Pending,
            payment_method: PaymentMethod::CashOnDelivery,
            address: Address::default(),
            created_at: now,
            date: now.date_naive(),
        };
        assert_eq!(order.recompute_total(), Some(Rupees(169)));
        assert!(order.totals_reconcile());

        let tampered = Order {
            total: Rupees(100),
            ..order
        };
        assert!(!tampered.totals_reconcile());
    }
}
