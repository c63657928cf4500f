//! Checkout arithmetic: delivery fee, discount and wallet share of an order total.

use crate::model::{AppliedDiscount, Rupees};
use serde::{Deserialize, Serialize};

/// Flat delivery fee, waived once the subtotal reaches the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingPolicy {
    pub delivery_fee: Rupees,
    pub free_delivery_threshold: Rupees,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            delivery_fee: Rupees(29),
            free_delivery_threshold: Rupees(199),
        }
    }
}

impl PricingPolicy {
    pub fn is_free_delivery(&self, subtotal: Rupees) -> bool {
        subtotal >= self.free_delivery_threshold
    }

    pub fn delivery_fee_for(&self, subtotal: Rupees) -> Rupees {
        if self.is_free_delivery(subtotal) {
            Rupees::ZERO
        } else {
            self.delivery_fee
        }
    }
}

/// The priced breakdown of one checkout.
///
/// `total = subtotal + delivery_fee − discount_applied − wallet_used`, and it never
/// goes below zero: the discount is capped at the gross amount and the wallet only
/// covers what the discount leaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub subtotal: Rupees,
    pub delivery_fee: Rupees,
    pub discount_code: Option<String>,
    pub discount_applied: Option<Rupees>,
    pub wallet_used: Option<Rupees>,
    pub total: Rupees,
}

impl Quote {
    /// `wallet_balance` is `Some` only when the shopper chose to pay from the wallet.
    pub fn compute(
        subtotal: Rupees,
        policy: &PricingPolicy,
        discount: Option<&AppliedDiscount>,
        wallet_balance: Option<Rupees>,
    ) -> Self {
        let delivery_fee = policy.delivery_fee_for(subtotal);
        let gross = subtotal + delivery_fee;

        let discount_applied = discount.map(|d| d.amount.min(gross));
        let after_discount = gross.saturating_sub(discount_applied.unwrap_or_default());

        let wallet_used = wallet_balance
            .map(|balance| balance.min(after_discount))
            .filter(|used| !used.is_zero());
        let total = after_discount.saturating_sub(wallet_used.unwrap_or_default());

        Self {
            subtotal,
            delivery_fee,
            discount_code: discount.map(|d| d.code.clone()),
            discount_applied: discount_applied.filter(|d| !d.is_zero()),
            wallet_used,
            total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn newuser() -> AppliedDiscount {
        AppliedDiscount {
            code: "NEWUSER".into(),
            amount: Rupees(10),
            description: "New user discount".into(),
        }
    }

    #[test]
    fn test_fee_charged_below_threshold_with_discount() {
        let quote = Quote::compute(Rupees(150), &PricingPolicy::default(), Some(&newuser()), None);
        assert_eq!(quote.delivery_fee, Rupees(29));
        assert_eq!(quote.discount_applied, Some(Rupees(10)));
        assert_eq!(quote.wallet_used, None);
        assert_eq!(quote.total, Rupees(169));
    }

    #[test]
    fn test_free_delivery_at_threshold() {
        let quote = Quote::compute(Rupees(199), &PricingPolicy::default(), None, None);
        assert_eq!(quote.delivery_fee, Rupees::ZERO);
        assert_eq!(quote.total, Rupees(199));
    }

    #[test]
    fn test_wallet_covers_part_of_total() {
        let quote = Quote::compute(
            Rupees(150),
            &PricingPolicy::default(),
            Some(&newuser()),
            Some(Rupees(50)),
        );
        assert_eq!(quote.wallet_used, Some(Rupees(50)));
        assert_eq!(quote.total, Rupees(119));
    }

    #[test]
    fn test_never_negative() {
        let big = AppliedDiscount {
            amount: Rupees(500),
            ..newuser()
        };
        let quote = Quote::compute(Rupees(100), &PricingPolicy::default(), Some(&big), Some(Rupees(1000)));
        assert_eq!(quote.discount_applied, Some(Rupees(129)));
        assert_eq!(quote.wallet_used, None);
        assert_eq!(quote.total, Rupees::ZERO);
    }
}
