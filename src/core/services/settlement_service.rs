use serde::Serialize;
use uuid::Uuid;

use crate::domain::{
    document::LedgerDocument,
    group::Group,
    settlement::{BalanceSheet, Transaction},
};
use crate::ledger::{compute_balances, simplify_debts};

/// Balances of a group together with the payments that settle them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SettlementReport {
    pub balances: BalanceSheet,
    pub transactions: Vec<Transaction>,
}

impl SettlementReport {
    pub fn is_settled(&self) -> bool {
        self.transactions.is_empty()
    }
}

pub struct SettlementService;

impl SettlementService {
    pub fn balances(group: &Group) -> BalanceSheet {
        compute_balances(group)
    }

    pub fn settlement(group: &Group) -> Vec<Transaction> {
        simplify_debts(&compute_balances(group))
    }

    pub fn report(group: &Group) -> SettlementReport {
        let balances = compute_balances(group);
        let transactions = simplify_debts(&balances);
        SettlementReport {
            balances,
            transactions,
        }
    }

    /// Balances for `group_id`; empty when the group does not exist.
    pub fn balances_for(document: &LedgerDocument, group_id: Uuid) -> BalanceSheet {
        document
            .group(group_id)
            .map(Self::balances)
            .unwrap_or_default()
    }

    /// Settlement for `group_id`; empty when the group does not exist.
    pub fn settlement_for(document: &LedgerDocument, group_id: Uuid) -> Vec<Transaction> {
        document
            .group(group_id)
            .map(Self::settlement)
            .unwrap_or_default()
    }
}
