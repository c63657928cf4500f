//! Custom actions for the Discount actor.

use crate::model::AppliedDiscount;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountAction {
    /// Checks the code can be used and returns what it is worth.
    ///
    /// # Errors
    /// `Inactive` if the code is switched off.
    Apply,
    /// Counts one placed order that used the code.
    RecordUsage,
    /// Flips the active flag.
    Toggle,
}

/// Results from DiscountActions - variants match 1:1 with DiscountAction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscountActionResult {
    Apply(AppliedDiscount),
    /// The usage count after recording.
    RecordUsage(u32),
    /// Whether the code is active after toggling.
    Toggle(bool),
}
