use std::sync::Arc;

use tokio::sync::RwLock;

use engine::{Ledger, LedgerError, Profile, RecordKind};

fn profile(name: &str) -> Profile {
    Profile {
        first_name: name.to_string(),
        last_name: "Test".to_string(),
        email: format!("{name}@example.com"),
        phone: "555-0100".to_string(),
        pin: "1234".to_string(),
    }
}

fn ledger_with_users(usernames: &[&str]) -> Ledger {
    let mut ledger = Ledger::new();
    for username in usernames {
        ledger.create_user(username, profile(username)).unwrap();
    }
    ledger
}

#[test]
fn balance_equals_sum_of_signed_amounts() {
    let mut ledger = ledger_with_users(&["alice"]);

    ledger.deposit("alice", 10_000, None).unwrap();
    ledger.withdraw("alice", 2_500, None).unwrap();
    ledger.deposit("alice", 300, None).unwrap();
    ledger.withdraw("alice", 300, None).unwrap();

    let recorded: i64 = ledger
        .history()
        .for_user("alice")
        .map(|record| record.amount_cents)
        .sum();
    assert_eq!(ledger.balance("alice").unwrap(), recorded);
    assert_eq!(ledger.balance("alice").unwrap(), 7_500);
}

#[test]
fn withdraw_with_insufficient_funds_leaves_state_untouched() {
    let mut ledger = ledger_with_users(&["alice"]);
    ledger.deposit("alice", 2_000, None).unwrap();

    let err = ledger.withdraw("alice", 5_000, None).unwrap_err();
    assert_eq!(err, LedgerError::InsufficientFunds("alice".to_string()));
    assert_eq!(ledger.balance("alice").unwrap(), 2_000);
    // Only the deposit was recorded.
    assert_eq!(ledger.history().len(), 1);
}

#[test]
fn transfer_moves_funds_and_writes_two_linked_legs() {
    let mut ledger = ledger_with_users(&["alice", "bob"]);
    ledger.deposit("alice", 10_000, None).unwrap();

    let receipt = ledger
        .transfer("alice", "bob", 3_000, Some("rent".to_string()))
        .unwrap();

    assert_eq!(receipt.from_balance_cents, 7_000);
    assert_eq!(receipt.to_balance_cents, 3_000);
    assert_eq!(ledger.balance("alice").unwrap(), 7_000);
    assert_eq!(ledger.balance("bob").unwrap(), 3_000);
    assert_eq!(ledger.history().len(), 3);

    let out_leg = ledger
        .history()
        .for_user("alice")
        .find(|record| record.kind == RecordKind::TransferOut)
        .unwrap();
    let in_leg = ledger
        .history()
        .for_user("bob")
        .find(|record| record.kind == RecordKind::TransferIn)
        .unwrap();

    assert_eq!(out_leg.amount_cents, -3_000);
    assert_eq!(in_leg.amount_cents, 3_000);
    assert_eq!(out_leg.counterparty.as_deref(), Some("bob"));
    assert_eq!(in_leg.counterparty.as_deref(), Some("alice"));
    assert_eq!(out_leg.occurred_at, in_leg.occurred_at);
    assert_eq!(out_leg.note, in_leg.note);
}

#[test]
fn transfer_to_self_always_fails() {
    let mut ledger = ledger_with_users(&["alice"]);
    ledger.deposit("alice", 10_000, None).unwrap();

    let err = ledger.transfer("alice", "alice", 100, None).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidInput(_)));
    assert_eq!(ledger.balance("alice").unwrap(), 10_000);
}

#[test]
fn transfer_to_unknown_receiver_fails() {
    let mut ledger = ledger_with_users(&["alice"]);
    ledger.deposit("alice", 10_000, None).unwrap();

    let err = ledger.transfer("alice", "ghost", 100, None).unwrap_err();
    assert_eq!(err, LedgerError::KeyNotFound("ghost".to_string()));
    assert_eq!(ledger.balance("alice").unwrap(), 10_000);
    assert_eq!(ledger.history().len(), 1);
}

#[test]
fn non_positive_amounts_are_rejected() {
    let mut ledger = ledger_with_users(&["alice"]);

    assert!(matches!(
        ledger.deposit("alice", 0, None).unwrap_err(),
        LedgerError::InvalidInput(_)
    ));
    assert!(matches!(
        ledger.withdraw("alice", -50, None).unwrap_err(),
        LedgerError::InvalidInput(_)
    ));
    assert!(ledger.history().is_empty());
}

#[test]
fn deposit_overflow_is_rejected_and_not_recorded() {
    let mut ledger = ledger_with_users(&["alice"]);
    ledger.deposit("alice", i64::MAX, None).unwrap();

    let err = ledger.deposit("alice", 1, None).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidInput(_)));
    assert_eq!(ledger.balance("alice").unwrap(), i64::MAX);
    // No record was appended for the rejected deposit, so the balance still
    // equals the sum of recorded amounts.
    assert_eq!(ledger.history().len(), 1);
    let recorded: i64 = ledger
        .history()
        .for_user("alice")
        .map(|record| record.amount_cents)
        .sum();
    assert_eq!(recorded, i64::MAX);
}

#[test]
fn transfer_overflow_leaves_both_balances_untouched() {
    let mut ledger = ledger_with_users(&["alice", "bob"]);
    ledger.deposit("alice", 100, None).unwrap();
    ledger.deposit("bob", i64::MAX, None).unwrap();

    let err = ledger.transfer("alice", "bob", 50, None).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidInput(_)));
    // The sender must not be debited when the credit leg is rejected.
    assert_eq!(ledger.balance("alice").unwrap(), 100);
    assert_eq!(ledger.balance("bob").unwrap(), i64::MAX);
    assert_eq!(ledger.history().len(), 2);
}

#[test]
fn duplicate_user_fails() {
    let mut ledger = ledger_with_users(&["alice"]);
    let err = ledger.create_user("alice", profile("alice")).unwrap_err();
    assert_eq!(err, LedgerError::ExistingKey("alice".to_string()));
}

#[test]
fn authenticate_checks_pin_format_then_existence() {
    let ledger = ledger_with_users(&["alice"]);

    ledger.authenticate("alice", "1234").unwrap();
    assert!(matches!(
        ledger.authenticate("alice", "12ab").unwrap_err(),
        LedgerError::InvalidInput(_)
    ));
    assert!(matches!(
        ledger.authenticate("alice", "123").unwrap_err(),
        LedgerError::InvalidInput(_)
    ));
    assert_eq!(
        ledger.authenticate("ghost", "1234").unwrap_err(),
        LedgerError::KeyNotFound("ghost".to_string())
    );
}

#[test]
fn recent_transactions_are_newest_first_and_capped_at_limit() {
    let mut ledger = ledger_with_users(&["alice"]);
    for cents in 1..=12 {
        ledger.deposit("alice", cents, None).unwrap();
    }

    let recent = ledger.recent_transactions("alice", 10).unwrap();
    assert_eq!(recent.len(), 10);
    let amounts: Vec<_> = recent.iter().map(|record| record.amount_cents).collect();
    assert_eq!(amounts, (3..=12).rev().collect::<Vec<i64>>());
}

#[test]
fn spending_summary_worked_example() {
    let mut ledger = ledger_with_users(&["alice", "bob"]);
    ledger.deposit("alice", 10_000, None).unwrap();
    let receipt = ledger
        .transfer("alice", "bob", 3_000, Some("groceries".to_string()))
        .unwrap();

    // No category attached yet: no spending data.
    assert!(ledger.dominant_spending("alice").unwrap().is_none());

    ledger.attach_category(&[receipt.out_record_id, receipt.in_record_id], "Food");

    let dominant = ledger.dominant_spending("alice").unwrap().unwrap();
    assert_eq!(dominant.category, "Food");
    assert_eq!(dominant.total_cents, 3_000);
    // Bob only has an inflow; no spending for him.
    assert!(ledger.dominant_spending("bob").unwrap().is_none());
}

#[test]
fn attach_category_never_changes_balances() {
    let mut ledger = ledger_with_users(&["alice"]);
    ledger
        .deposit("alice", 1_000, Some("coffee".to_string()))
        .unwrap();
    let receipt = ledger
        .withdraw("alice", 400, Some("coffee".to_string()))
        .unwrap();

    ledger.attach_category(&[receipt.record_id], "Food");

    assert_eq!(ledger.balance("alice").unwrap(), 600);
    let record = ledger
        .history()
        .for_user("alice")
        .find(|record| record.id == receipt.record_id)
        .unwrap();
    assert_eq!(record.category.as_deref(), Some("Food"));
    assert_eq!(record.amount_cents, -400);
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_withdrawals_never_overdraw() {
    let ledger = Arc::new(RwLock::new(ledger_with_users(&["alice"])));
    ledger.write().await.deposit("alice", 10_000, None).unwrap();

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..5 {
        let ledger = Arc::clone(&ledger);
        tasks.spawn(async move {
            let mut ledger = ledger.write().await;
            ledger.withdraw("alice", 3_000, None).is_ok()
        });
    }

    let mut succeeded = 0;
    while let Some(result) = tasks.join_next().await {
        if result.unwrap() {
            succeeded += 1;
        }
    }

    // Exactly the withdrawals that fit must succeed: 3 * 3000 <= 10000.
    assert_eq!(succeeded, 3);
    let ledger = ledger.read().await;
    assert_eq!(ledger.balance("alice").unwrap(), 1_000);
}
