use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};

/// A whole-rupee amount. Every price, fee, discount and wallet balance uses this type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rupees(pub u64);

impl Rupees {
    pub const ZERO: Rupees = Rupees(0);

    pub fn value(self) -> u64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, rhs: Rupees) -> Option<Rupees> {
        self.0.checked_add(rhs.0).map(Rupees)
    }

    pub fn checked_mul(self, quantity: u32) -> Option<Rupees> {
        self.0.checked_mul(u64::from(quantity)).map(Rupees)
    }

    pub fn checked_sub(self, rhs: Rupees) -> Option<Rupees> {
        self.0.checked_sub(rhs.0).map(Rupees)
    }

    pub fn saturating_sub(self, rhs: Rupees) -> Rupees {
        Rupees(self.0.saturating_sub(rhs.0))
    }
}

impl From<u64> for Rupees {
    fn from(value: u64) -> Self {
        Rupees(value)
    }
}

// The operators saturate at `u64::MAX`. Balances and cart totals go through the
// checked forms instead.
impl Add for Rupees {
    type Output = Rupees;

    fn add(self, rhs: Rupees) -> Rupees {
        Rupees(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Rupees {
    fn add_assign(&mut self, rhs: Rupees) {
        *self = *self + rhs;
    }
}

impl Mul<u32> for Rupees {
    type Output = Rupees;

    fn mul(self, quantity: u32) -> Rupees {
        Rupees(self.0.saturating_mul(u64::from(quantity)))
    }
}

impl Sum for Rupees {
    fn sum<I: Iterator<Item = Rupees>>(iter: I) -> Rupees {
        iter.fold(Rupees::ZERO, Add::add)
    }
}

impl fmt::Display for Rupees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "₹{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic_and_display() {
        let line = Rupees(150) * 2;
        assert_eq!(line, Rupees(300));
        assert_eq!(vec![Rupees(1), Rupees(2)].into_iter().sum::<Rupees>(), Rupees(3));
        assert_eq!(Rupees(5).checked_sub(Rupees(6)), None);
        assert_eq!(Rupees(5).saturating_sub(Rupees(6)), Rupees::ZERO);
        assert_eq!(Rupees(49000).to_string(), "₹49000");
    }

    #[test]
    fn test_overflow_is_checked_or_saturated() {
        let max = Rupees(u64::MAX);
        assert_eq!(max.checked_add(Rupees(1)), None);
        assert_eq!(Rupees(40).checked_add(Rupees(2)), Some(Rupees(42)));
        assert_eq!(max.checked_mul(2), None);
        assert_eq!(Rupees(75).checked_mul(2), Some(Rupees(150)));
        assert_eq!(max + Rupees(1), max);
        assert_eq!(max * 3, max);
    }

    #[test]
    fn test_serializes_as_plain_number() {
        assert_eq!(serde_json::to_string(&Rupees(29)).unwrap(), "29");
        let parsed: Rupees = serde_json::from_str("199").unwrap();
        assert_eq!(parsed, Rupees(199));
    }
}
