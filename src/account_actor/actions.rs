//! Custom actions for the Account actor.
//!
//! Every wallet movement is an action, so the balance check and the balance change happen
//! inside one message and cannot interleave with another movement on the same account.

use crate::model::{EntryTags, Rupees, WalletTransaction};

#[derive(Debug, Clone)]
pub enum AccountAction {
    /// Adds funds and records a credit entry.
    Credit {
        amount: Rupees,
        description: String,
        tags: EntryTags,
    },
    /// Removes funds and records a debit entry.
    ///
    /// # Errors
    /// `InsufficientFunds` if the amount exceeds the balance.
    Debit {
        amount: Rupees,
        description: String,
        tags: EntryTags,
    },
    /// Reads the ledger, most recent first. `None` uses the configured limit.
    History { limit: Option<usize> },
}

/// Results from AccountActions - variants match 1:1 with AccountAction
#[derive(Debug, Clone)]
pub enum AccountActionResult {
    Credit(WalletTransaction),
    Debit(WalletTransaction),
    History(Vec<WalletTransaction>),
}
