//! Settlement engine: share computation, balance aggregation and debt
//! simplification. Every function here is pure and takes its inputs
//! explicitly.

pub mod balances;
pub mod money;
pub mod shares;
pub mod simplify;

use std::collections::BTreeSet;

pub use balances::BalanceCalculator;
pub use money::{approx_eq, is_negligible, round_cents, TOLERANCE};
pub use shares::ShareCalculator;
pub use simplify::DebtSimplifier;

use crate::domain::{
    expense::{Shares, SplitRule},
    group::Group,
    settlement::{BalanceSheet, Transaction},
};
use crate::errors::ValidationError;

/// Shares for `amount` split by `rule` among `members` minus `excluded`.
pub fn compute_shares(
    amount: f64,
    rule: &SplitRule,
    members: &[String],
    excluded: &BTreeSet<String>,
) -> Result<Shares, ValidationError> {
    ShareCalculator::compute(amount, rule, members, excluded)
}

/// Net balance of every current member of `group`.
pub fn compute_balances(group: &Group) -> BalanceSheet {
    BalanceCalculator::compute(group)
}

/// Payments that bring every balance in `balances` back to zero.
pub fn simplify_debts(balances: &BalanceSheet) -> Vec<Transaction> {
    DebtSimplifier::simplify(balances)
}

/// Balances of `group` followed by the payments that settle them.
pub fn compute_settlement(group: &Group) -> Vec<Transaction> {
    simplify_debts(&compute_balances(group))
}
