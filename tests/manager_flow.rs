mod common;

use std::collections::BTreeSet;

use split_ledger::{
    core::{ledger_manager::LedgerManager, services::ServiceError},
    domain::{expense::ExpenseDraft, settlement::Transaction},
    errors::ValidationError,
    storage::MemoryStorage,
};
use uuid::Uuid;

use common::{names, setup_test_env};

#[test]
fn full_trip_settles_with_minimal_payments() {
    let (manager, _config, _base) = setup_test_env();
    let group = manager
        .create_group("Road trip", &names(&["Alice", "Bob", "Carol", "Dave"]))
        .unwrap();

    manager
        .add_expense(group.id, ExpenseDraft::equal("Fuel", 120.0, "Alice"))
        .unwrap();
    manager
        .add_expense(
            group.id,
            ExpenseDraft::equal("Museum", 60.0, "Bob").excluding(["Dave"]),
        )
        .unwrap();
    manager
        .add_expense(
            group.id,
            ExpenseDraft::percentage(
                "Cabin",
                400.0,
                "Carol",
                [("Alice", 25.0), ("Bob", 25.0), ("Carol", 25.0), ("Dave", 25.0)],
            ),
        )
        .unwrap();

    let report = manager.report(group.id).unwrap();
    // Alice +120-30-20-100, Bob +60-30-20-100, Carol +400-30-20-100, Dave -30-100
    assert_eq!(report.balances.get("Alice"), Some(-30.0));
    assert_eq!(report.balances.get("Bob"), Some(-90.0));
    assert_eq!(report.balances.get("Carol"), Some(250.0));
    assert_eq!(report.balances.get("Dave"), Some(-130.0));
    assert_eq!(
        report.transactions,
        vec![
            Transaction::new("Dave", "Carol", 130.0),
            Transaction::new("Bob", "Carol", 90.0),
            Transaction::new("Alice", "Carol", 30.0),
        ]
    );
    assert_eq!(manager.settlement(group.id).unwrap(), report.transactions);
}

#[test]
fn editing_an_expense_changes_the_settlement() {
    let manager = LedgerManager::new(Box::new(MemoryStorage::new()));
    let group = manager
        .create_group("Lunch", &names(&["Alice", "Bob"]))
        .unwrap();
    let expense = manager
        .add_expense(group.id, ExpenseDraft::equal("Pizza", 30.0, "Alice"))
        .unwrap();
    assert_eq!(
        manager.settlement(group.id).unwrap(),
        vec![Transaction::new("Bob", "Alice", 15.0)]
    );

    let updated = manager
        .update_expense(
            group.id,
            expense.id,
            ExpenseDraft::equal("Pizza", 30.0, "Bob"),
        )
        .unwrap();
    assert_eq!(updated.id, expense.id);
    assert_eq!(updated.created_at, expense.created_at);
    assert_eq!(
        manager.settlement(group.id).unwrap(),
        vec![Transaction::new("Alice", "Bob", 15.0)]
    );

    manager.delete_expense(group.id, expense.id).unwrap();
    assert!(manager.settlement(group.id).unwrap().is_empty());
    assert!(manager.balances(group.id).unwrap().is_settled());
}

#[test]
fn write_paths_fail_for_unknown_ids() {
    let manager = LedgerManager::new(Box::new(MemoryStorage::new()));
    let missing = Uuid::new_v4();
    assert!(matches!(
        manager.add_expense(missing, ExpenseDraft::equal("Tea", 3.0, "Alice")),
        Err(ServiceError::GroupNotFound(_))
    ));
    assert!(manager.rename_group(missing, "New").unwrap_err().is_not_found());

    let group = manager.create_group("Tea", &names(&["Alice"])).unwrap();
    assert!(matches!(
        manager.delete_expense(group.id, missing),
        Err(ServiceError::ExpenseNotFound(_))
    ));
}

#[test]
fn member_management_round_trip() {
    let manager = LedgerManager::new(Box::new(MemoryStorage::new()));
    let group = manager
        .create_group("Flat", &names(&["Ann", "Ben"]))
        .unwrap();
    manager.add_member(group.id, "  Cat ").unwrap();
    assert!(matches!(
        manager.add_member(group.id, "Cat"),
        Err(ServiceError::Validation(ValidationError::DuplicateMember(_)))
    ));

    let rent = manager
        .add_expense(group.id, ExpenseDraft::equal("Rent", 900.0, "Ann"))
        .unwrap();
    let snacks = manager
        .add_expense(group.id, ExpenseDraft::equal("Snacks", 30.0, "Cat"))
        .unwrap();

    let removal = manager.remove_member(group.id, "Cat").unwrap();
    assert_eq!(removal.dropped_expenses, vec![snacks.id]);
    assert_eq!(removal.rebalanced_expenses, vec![rent.id]);

    let stored = manager.group(group.id).unwrap();
    assert_eq!(stored.members, names(&["Ann", "Ben"]));
    assert_eq!(stored.expenses.len(), 1);
    assert_eq!(
        manager.settlement(group.id).unwrap(),
        vec![Transaction::new("Ben", "Ann", 450.0)]
    );
    assert!(manager.warnings().unwrap().is_empty());
}

#[test]
fn lookups_and_suggestions() {
    let manager = LedgerManager::new(Box::new(MemoryStorage::new()));
    let trip = manager
        .create_group("Trip", &names(&["Alice", "Bob", "Carol", "Dave"]))
        .unwrap();
    manager
        .create_group("Flat", &names(&["Ann"]))
        .unwrap();

    assert_eq!(manager.list_groups().unwrap().len(), 2);
    assert_eq!(
        manager.find_group("TRIP").unwrap().map(|group| group.id),
        Some(trip.id)
    );
    assert!(manager.find_group("Nowhere").unwrap().is_none());

    let excluded: BTreeSet<String> = ["Dave".to_string()].into_iter().collect();
    let suggested = manager.suggest_percentages(trip.id, &excluded).unwrap();
    assert_eq!(suggested.len(), 3);
    assert_eq!(suggested["Alice"], 33.33);
    assert_eq!(suggested["Carol"], 33.34);
}

#[test]
fn suggested_percentages_are_accepted_as_entered() {
    let manager = LedgerManager::new(Box::new(MemoryStorage::new()));
    let flat = manager
        .create_group("Flat", &names(&["Ann", "Ben", "Cat", "Dan", "Eve", "Fay"]))
        .unwrap();
    let suggested = manager.suggest_percentages(flat.id, &BTreeSet::new()).unwrap();

    let expense = manager
        .add_expense(
            flat.id,
            ExpenseDraft::percentage("Rent", 1200.0, "Ann", suggested),
        )
        .unwrap();
    assert!((expense.shares_total() - 1200.0).abs() <= 0.01);
    assert!(manager.warnings().unwrap().is_empty());
}
