//! Derived settlement values. Recomputed on demand and never persisted.

use serde::{Deserialize, Serialize};

use crate::ledger::money::{is_negligible, TOLERANCE};

/// Net position of one member: positive means the member is owed money.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberBalance {
    pub member: String,
    pub amount: f64,
}

impl MemberBalance {
    pub fn is_creditor(&self) -> bool {
        self.amount >= TOLERANCE
    }

    pub fn is_debtor(&self) -> bool {
        self.amount <= -TOLERANCE
    }

    pub fn is_settled(&self) -> bool {
        is_negligible(self.amount)
    }
}

/// Balances for every current member of a group, in member order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BalanceSheet {
    entries: Vec<MemberBalance>,
}

impl BalanceSheet {
    /// Starts every listed member at zero. Repeated names are kept once.
    pub fn for_members<'a, I>(members: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut sheet = Self::default();
        for member in members {
            if sheet.position(member).is_none() {
                sheet.entries.push(MemberBalance {
                    member: member.to_string(),
                    amount: 0.0,
                });
            }
        }
        sheet
    }

    /// Adds `amount` to `member`. Returns `false` when the member is unknown.
    pub fn credit(&mut self, member: &str, amount: f64) -> bool {
        match self.position(member) {
            Some(index) => {
                self.entries[index].amount += amount;
                true
            }
            None => false,
        }
    }

    /// Subtracts `amount` from `member`. Returns `false` when the member is unknown.
    pub fn debit(&mut self, member: &str, amount: f64) -> bool {
        self.credit(member, -amount)
    }

    pub fn get(&self, member: &str) -> Option<f64> {
        self.position(member).map(|index| self.entries[index].amount)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MemberBalance> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all balances; zero (within tolerance) when money is conserved.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|entry| entry.amount).sum()
    }

    pub fn is_settled(&self) -> bool {
        self.entries.iter().all(MemberBalance::is_settled)
    }

    /// Largest creditor first, largest debtor last.
    pub fn ranked(&self) -> Vec<&MemberBalance> {
        let mut ranked: Vec<_> = self.entries.iter().collect();
        ranked.sort_by(|a, b| b.amount.total_cmp(&a.amount));
        ranked
    }

    /// Balances left over once every transaction has been paid.
    pub fn after_payments(&self, transactions: &[Transaction]) -> BalanceSheet {
        let mut residual = self.clone();
        for txn in transactions {
            residual.credit(&txn.from, txn.amount);
            residual.debit(&txn.to, txn.amount);
        }
        residual
    }

    fn position(&self, member: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.member == member)
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for BalanceSheet {
    fn from_iter<T: IntoIterator<Item = (S, f64)>>(iter: T) -> Self {
        let mut sheet = BalanceSheet::default();
        for (member, amount) in iter {
            let member = member.into();
            match sheet.position(&member) {
                Some(index) => sheet.entries[index].amount += amount,
                None => sheet.entries.push(MemberBalance { member, amount }),
            }
        }
        sheet
    }
}

/// A recommended payment from a debtor to a creditor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

impl Transaction {
    pub fn new(from: impl Into<String>, to: impl Into<String>, amount: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            amount,
        }
    }
}
