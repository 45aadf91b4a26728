#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use once_cell::sync::Lazy;
use split_ledger::{
    config::ConfigManager,
    core::ledger_manager::LedgerManager,
    domain::{
        expense::{Distribution, Expense, Shares},
        group::Group,
    },
    storage::JsonStorage,
};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Fresh directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Creates isolated managers backed by unique directories for each test.
pub fn setup_test_env() -> (LedgerManager, ConfigManager, PathBuf) {
    let base = temp_base();
    let storage = JsonStorage::new(Some(base.clone()), Some(3)).expect("create json storage");
    let ledger_manager = LedgerManager::new(Box::new(storage));
    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    (ledger_manager, config_manager, base)
}

pub fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|name| name.to_string()).collect()
}

/// Group with a single expense carrying the given shares verbatim.
pub fn group_with_expense(
    members: &[&str],
    amount: f64,
    paid_by: &str,
    shares: &[(&str, f64)],
) -> Group {
    let mut group = Group::new("Fixture", names(members));
    let shares: Shares = shares
        .iter()
        .map(|(member, value)| (member.to_string(), *value))
        .collect();
    group.add_expense(Expense::new(
        "Fixture expense",
        amount,
        paid_by,
        Distribution::Equal,
        shares,
        Default::default(),
    ));
    group
}
