//! Wallet ledger rules.
//!
//! The balance of an account only ever moves through [`Account::credit`] and
//! [`Account::debit`], and each call appends exactly one [`WalletTransaction`]. At any
//! point `wallet_balance == Σ credits − Σ debits`, which [`Account::reconcile`] checks.

use super::AccountError;
use crate::ids::next_transaction_id;
use crate::model::{Account, EntryTags, Rupees, TransactionKind, WalletTransaction};
use chrono::Utc;

impl Account {
    /// Adds `amount` to the balance and records a credit. Fails without side effects
    /// when the new balance would not fit.
    pub fn credit(
        &mut self,
        amount: Rupees,
        description: impl Into<String>,
        tags: EntryTags,
    ) -> Result<WalletTransaction, AccountError> {
        if amount.is_zero() {
            return Err(AccountError::InvalidAmount);
        }
        self.wallet_balance = self
            .wallet_balance
            .checked_add(amount)
            .ok_or(AccountError::BalanceOverflow {
                balance: self.wallet_balance,
                amount,
            })?;
        Ok(self.post(TransactionKind::Credit, amount, description.into(), tags))
    }

    /// Takes `amount` from the balance and records a debit. Fails without side effects
    /// when the balance does not cover it.
    pub fn debit(
        &mut self,
        amount: Rupees,
        description: impl Into<String>,
        tags: EntryTags,
    ) -> Result<WalletTransaction, AccountError> {
        if amount.is_zero() {
            return Err(AccountError::InvalidAmount);
        }
        self.wallet_balance =
            self.wallet_balance
                .checked_sub(amount)
                .ok_or(AccountError::InsufficientFunds {
                    available: self.wallet_balance,
                    requested: amount,
                })?;
        Ok(self.post(TransactionKind::Debit, amount, description.into(), tags))
    }

    fn post(
        &mut self,
        kind: TransactionKind,
        amount: Rupees,
        description: String,
        tags: EntryTags,
    ) -> WalletTransaction {
        let timestamp = Utc::now();
        let entry = WalletTransaction {
            id: next_transaction_id(),
            owner: self.id.clone(),
            kind,
            amount,
            description,
            date: timestamp.date_naive(),
            timestamp,
            tags,
        };
        self.ledger.push(entry.clone());
        entry
    }

    /// Up to `limit` entries, most recent first.
    pub fn history(&self, limit: usize) -> Vec<WalletTransaction> {
        self.ledger.iter().rev().take(limit).cloned().collect()
    }

    pub fn ledger_total(&self) -> i128 {
        self.ledger.iter().map(WalletTransaction::signed_amount).sum()
    }

    pub fn reconcile(&self) -> Result<(), AccountError> {
        let ledger_total = self.ledger_total();
        if ledger_total != i128::from(self.wallet_balance.0) {
            return Err(AccountError::Unreconciled {
                id: self.id.clone(),
                balance: self.wallet_balance,
                ledger_total,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AccountId, OrderId, Role};

    fn account() -> Account {
        Account {
            id: AccountId::from("asha_1"),
            role: Role::User,
            name: "Asha".into(),
            email: "asha@example.com".into(),
            phone: None,
            wallet_balance: Rupees::ZERO,
            address: None,
            profile_picture: None,
            created_at: Utc::now(),
            ledger: Vec::new(),
        }
    }

    #[test]
    fn test_balance_is_credits_minus_debits() {
        let mut acc = account();
        acc.credit(Rupees(50), "Welcome bonus", EntryTags::default()).unwrap();
        acc.credit(Rupees(1000), "Top up", EntryTags::default()).unwrap();
        acc.debit(Rupees(179), "Order payment - KM1", EntryTags::order(OrderId::from("KM1")))
            .unwrap();

        assert_eq!(acc.wallet_balance, Rupees(871));
        assert_eq!(acc.ledger.len(), 3);
        assert!(acc.reconcile().is_ok());
    }

    #[test]
    fn test_overdraft_rejected_without_mutation() {
        let mut acc = account();
        acc.credit(Rupees(50), "Welcome bonus", EntryTags::default()).unwrap();

        let err = acc.debit(Rupees(51), "too much", EntryTags::default()).unwrap_err();
        assert!(matches!(
            err,
            AccountError::InsufficientFunds { available: Rupees(50), requested: Rupees(51) }
        ));
        assert_eq!(acc.wallet_balance, Rupees(50));
        assert_eq!(acc.ledger.len(), 1);
    }

    #[test]
    fn test_zero_amounts_rejected() {
        let mut acc = account();
        assert!(matches!(
            acc.credit(Rupees::ZERO, "nothing", EntryTags::default()),
            Err(AccountError::InvalidAmount)
        ));
        assert!(matches!(
            acc.debit(Rupees::ZERO, "nothing", EntryTags::default()),
            Err(AccountError::InvalidAmount)
        ));
        assert!(acc.ledger.is_empty());
    }

    #[test]
    fn test_credit_past_the_largest_balance_rejected() {
        let mut acc = account();
        acc.credit(Rupees(50_000), "Initial admin wallet balance", EntryTags::default())
            .unwrap();

        let err = acc
            .credit(Rupees(u64::MAX), "huge", EntryTags::default())
            .unwrap_err();
        assert!(matches!(
            err,
            AccountError::BalanceOverflow { balance: Rupees(50_000), amount: Rupees(u64::MAX) }
        ));
        assert_eq!(acc.wallet_balance, Rupees(50_000));
        assert_eq!(acc.ledger.len(), 1);
        assert!(acc.reconcile().is_ok());

        // the largest amount that still fits goes through
        acc.credit(Rupees(u64::MAX - 50_000), "top up", EntryTags::default()).unwrap();
        assert_eq!(acc.wallet_balance, Rupees(u64::MAX));
        assert!(acc.reconcile().is_ok());
    }

    #[test]
    fn test_history_most_recent_first_with_limit() {
        let mut acc = account();
        for n in 1..=5 {
            acc.credit(Rupees(n), format!("credit {}", n), EntryTags::default()).unwrap();
        }
        let recent = acc.history(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].description, "credit 5");
        assert_eq!(recent[1].description, "credit 4");
    }

    #[test]
    fn test_reconcile_detects_raw_balance_write() {
        let mut acc = account();
        acc.credit(Rupees(50), "Welcome bonus", EntryTags::default()).unwrap();
        acc.wallet_balance = Rupees(5000);
        assert!(matches!(acc.reconcile(), Err(AccountError::Unreconciled { ledger_total: 50, .. })));
    }
}
