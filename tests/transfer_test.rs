//! Transfer orchestration against scripted account actors.
//!
//! The real actors never fail a credit, so the compensation branches are driven with
//! `MockClient` replies instead.

use actor_framework::mock::MockClient;
use actor_framework::FrameworkError;
use chrono::Utc;
use kalingamart::account_actor::{AccountActionResult, AccountError};
use kalingamart::clients::AccountClient;
use kalingamart::model::{
    Account, AccountId, EntryTags, Role, Rupees, TransactionKind, WalletTransaction,
};
use kalingamart::services::{TransferError, TransferService};

fn account(id: &str, role: Role, name: &str, balance: u64) -> Account {
    Account {
        id: AccountId::from(id),
        role,
        name: name.to_string(),
        email: format!("{}@kalingamart.com", id),
        phone: None,
        wallet_balance: Rupees(balance),
        address: None,
        profile_picture: None,
        created_at: Utc::now(),
        ledger: Vec::new(),
    }
}

fn entry(owner: &str, kind: TransactionKind, amount: u64, description: &str) -> WalletTransaction {
    let now = Utc::now();
    WalletTransaction {
        id: format!("txn_{}_{}", now.timestamp_millis(), amount),
        owner: AccountId::from(owner),
        kind,
        amount: Rupees(amount),
        description: description.to_string(),
        date: now.date_naive(),
        timestamp: now,
        tags: EntryTags::default(),
    }
}

struct Fixture {
    admins: MockClient<Account>,
    users: MockClient<Account>,
    admin_id: AccountId,
    user_id: AccountId,
}

impl Fixture {
    /// Both accounts exist; the admin holds ₹50000.
    fn new() -> Self {
        let mut admins = MockClient::<Account>::new();
        let mut users = MockClient::<Account>::new();
        let admin_id = AccountId::from("admin_001");
        let user_id = AccountId::from("asha_1");
        admins
            .expect_get(admin_id.clone())
            .return_ok(Some(account("admin_001", Role::Admin, "Admin", 50_000)));
        users
            .expect_get(user_id.clone())
            .return_ok(Some(account("asha_1", Role::User, "Asha", 50)));
        Self {
            admins,
            users,
            admin_id,
            user_id,
        }
    }

    fn service(&self) -> TransferService {
        TransferService::new(
            AccountClient::new(self.admins.client()),
            AccountClient::new(self.users.client()),
        )
    }
}

#[tokio::test]
async fn test_transfer_posts_debit_then_credit() {
    let mut f = Fixture::new();
    f.admins.expect_action(f.admin_id.clone()).return_ok(AccountActionResult::Debit(entry(
        "admin_001",
        TransactionKind::Debit,
        1_000,
        "Transfer to Asha",
    )));
    f.users.expect_action(f.user_id.clone()).return_ok(AccountActionResult::Credit(entry(
        "asha_1",
        TransactionKind::Credit,
        1_000,
        "Transfer from admin",
    )));

    let receipt = f
        .service()
        .try_transfer(&f.admin_id, &f.user_id, Rupees(1_000), None)
        .await
        .expect("transfer should complete");

    assert_eq!(receipt.debit.amount, Rupees(1_000));
    assert_eq!(receipt.credit.description, "Transfer from admin");

    let admin_calls = f.admins.recorded();
    assert_eq!(admin_calls.len(), 2);
    assert!(admin_calls[1].starts_with("Action admin_001 Debit"));
    assert!(admin_calls[1].contains("Transfer to Asha"));
    assert!(admin_calls[1].contains("recipient_name: Some(\"Asha\")"));

    let user_calls = f.users.recorded();
    assert!(user_calls[1].starts_with("Action asha_1 Credit"));
    assert!(user_calls[1].contains("description: \"Transfer from admin\""));
    assert!(user_calls[1].contains("from_admin: Some(AccountId(\"admin_001\"))"));
    f.admins.verify();
    f.users.verify();
}

#[tokio::test]
async fn test_custom_description_is_used_on_both_sides() {
    let mut f = Fixture::new();
    f.admins.expect_action(f.admin_id.clone()).return_ok(AccountActionResult::Debit(entry(
        "admin_001",
        TransactionKind::Debit,
        200,
        "Refund for KM1",
    )));
    f.users.expect_action(f.user_id.clone()).return_ok(AccountActionResult::Credit(entry(
        "asha_1",
        TransactionKind::Credit,
        200,
        "Transfer from admin: Refund for KM1",
    )));

    assert!(
        f.service()
            .transfer(&f.admin_id, &f.user_id, Rupees(200), Some("  Refund for KM1 "))
            .await
    );
    assert!(f.admins.recorded()[1].contains("description: \"Refund for KM1\""));
    assert!(f.users.recorded()[1].contains("description: \"Transfer from admin: Refund for KM1\""));
}

#[tokio::test]
async fn test_overdraft_is_rejected_before_any_credit() {
    let mut f = Fixture::new();
    f.admins
        .expect_action(f.admin_id.clone())
        .return_err(FrameworkError::EntityError(Box::new(AccountError::InsufficientFunds {
            available: Rupees(50_000),
            requested: Rupees(60_000),
        })));

    let err = f
        .service()
        .try_transfer(&f.admin_id, &f.user_id, Rupees(60_000), None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        TransferError::InsufficientFunds {
            available: Rupees(50_000),
            requested: Rupees(60_000)
        }
    ));
    // only the lookup reached the user actor
    assert_eq!(f.users.recorded(), vec!["Get asha_1".to_string()]);
    f.admins.verify();
}

#[tokio::test]
async fn test_failed_credit_is_reversed() {
    let mut f = Fixture::new();
    f.admins.expect_action(f.admin_id.clone()).return_ok(AccountActionResult::Debit(entry(
        "admin_001",
        TransactionKind::Debit,
        1_000,
        "Transfer to Asha",
    )));
    f.users
        .expect_action(f.user_id.clone())
        .return_err(FrameworkError::ActorClosed);
    f.admins.expect_action(f.admin_id.clone()).return_ok(AccountActionResult::Credit(entry(
        "admin_001",
        TransactionKind::Credit,
        1_000,
        "Reversal: Transfer to Asha",
    )));

    let err = f
        .service()
        .try_transfer(&f.admin_id, &f.user_id, Rupees(1_000), None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        TransferError::Reversed {
            source: AccountError::ActorCommunicationError(_)
        }
    ));
    let admin_calls = f.admins.recorded();
    assert_eq!(admin_calls.len(), 3);
    assert!(admin_calls[2].starts_with("Action admin_001 Credit"));
    assert!(admin_calls[2].contains("Reversal: Transfer to Asha"));
    f.admins.verify();
    f.users.verify();
}

#[tokio::test]
async fn test_failed_reversal_reports_partial_transfer() {
    let mut f = Fixture::new();
    let debit = entry("admin_001", TransactionKind::Debit, 1_000, "Transfer to Asha");
    let debit_id = debit.id.clone();
    f.admins
        .expect_action(f.admin_id.clone())
        .return_ok(AccountActionResult::Debit(debit));
    f.users
        .expect_action(f.user_id.clone())
        .return_err(FrameworkError::ActorClosed);
    f.admins
        .expect_action(f.admin_id.clone())
        .return_err(FrameworkError::ActorClosed);

    let err = f
        .service()
        .try_transfer(&f.admin_id, &f.user_id, Rupees(1_000), None)
        .await
        .unwrap_err();

    match err {
        TransferError::PartiallyApplied {
            debit_id: reported,
            amount,
            ..
        } => {
            assert_eq!(reported, debit_id);
            assert_eq!(amount, Rupees(1_000));
        }
        other => panic!("expected PartiallyApplied, got {:?}", other),
    }
}

#[tokio::test]
async fn test_zero_amount_sends_nothing() {
    let admins = MockClient::<Account>::new();
    let users = MockClient::<Account>::new();
    let service = TransferService::new(AccountClient::new(admins.client()), AccountClient::new(users.client()));

    let err = service
        .try_transfer(&AccountId::from("admin_001"), &AccountId::from("asha_1"), Rupees::ZERO, None)
        .await
        .unwrap_err();

    assert!(matches!(err, TransferError::InvalidAmount));
    assert!(admins.recorded().is_empty());
    assert!(users.recorded().is_empty());
}

#[tokio::test]
async fn test_unknown_user_is_not_found() {
    let mut admins = MockClient::<Account>::new();
    let mut users = MockClient::<Account>::new();
    admins
        .expect_get(AccountId::from("admin_001"))
        .return_ok(Some(account("admin_001", Role::Admin, "Admin", 50_000)));
    users.expect_get(AccountId::from("ghost")).return_ok(None);
    let service = TransferService::new(AccountClient::new(admins.client()), AccountClient::new(users.client()));

    let err = service
        .try_transfer(&AccountId::from("admin_001"), &AccountId::from("ghost"), Rupees(10), None)
        .await
        .unwrap_err();

    assert!(matches!(err, TransferError::UserNotFound(id) if id.as_str() == "ghost"));
    admins.verify();
    users.verify();
}
