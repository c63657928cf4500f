use crate::model::Rupees;
use serde::{Deserialize, Serialize};

/// A fixed-amount promo code. The normalized (upper-case) code is also its id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountCode {
    pub code: String,
    pub amount: Rupees,
    #[serde(default)]
    pub description: String,
    pub active: bool,
    #[serde(default)]
    pub usage_count: u32,
}

/// Codes compare case-insensitively; `" newuser "` and `"NEWUSER"` are the same code.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

#[derive(Debug, Clone)]
pub struct DiscountCreate {
    pub code: String,
    pub amount: Rupees,
    pub description: String,
    pub active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct DiscountUpdate {
    pub amount: Option<Rupees>,
    pub description: Option<String>,
}

/// A discount accepted for the current checkout. Applying another code replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedDiscount {
    pub code: String,
    pub amount: Rupees,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code(" newUser "), "NEWUSER");
        assert_eq!(normalize_code("SAVE20"), "SAVE20");
    }
}
