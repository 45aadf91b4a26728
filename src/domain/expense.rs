use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;

/// Amount owed by each member for a single expense.
pub type Shares = BTreeMap<String, f64>;

/// How an expense amount was divided between members.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Distribution {
    #[default]
    Equal,
    Percentage,
}

/// Caller-supplied split instructions consumed by the share calculator.
#[derive(Debug, Clone, PartialEq)]
pub enum SplitRule {
    Equal,
    /// Member name to percentage (0-100). Members left out count as 0%.
    Percentage(BTreeMap<String, f64>),
}

impl SplitRule {
    pub fn distribution(&self) -> Distribution {
        match self {
            SplitRule::Equal => Distribution::Equal,
            SplitRule::Percentage(_) => Distribution::Percentage,
        }
    }
}

/// Unvalidated expense input used for both creation and updates.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    pub description: String,
    pub amount: f64,
    pub paid_by: String,
    pub rule: SplitRule,
    pub excluded: BTreeSet<String>,
}

impl ExpenseDraft {
    /// Draft split equally between every member of the group.
    pub fn equal(description: impl Into<String>, amount: f64, paid_by: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            amount,
            paid_by: paid_by.into(),
            rule: SplitRule::Equal,
            excluded: BTreeSet::new(),
        }
    }

    /// Draft split according to explicit per-member percentages.
    pub fn percentage<I, S>(
        description: impl Into<String>,
        amount: f64,
        paid_by: impl Into<String>,
        percentages: I,
    ) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            description: description.into(),
            amount,
            paid_by: paid_by.into(),
            rule: SplitRule::Percentage(
                percentages
                    .into_iter()
                    .map(|(member, pct)| (member.into(), pct))
                    .collect(),
            ),
            excluded: BTreeSet::new(),
        }
    }

    pub fn excluding<I, S>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded.extend(members.into_iter().map(Into::into));
        self
    }
}

/// A recorded expense with its computed per-member shares.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    pub id: Uuid,
    pub description: String,
    pub amount: f64,
    pub paid_by: String,
    #[serde(default)]
    pub distribution: Distribution,
    #[serde(default)]
    pub shares: Shares,
    #[serde(default)]
    pub excluded: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(
        description: impl Into<String>,
        amount: f64,
        paid_by: impl Into<String>,
        distribution: Distribution,
        shares: Shares,
        excluded: BTreeSet<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            amount,
            paid_by: paid_by.into(),
            distribution,
            shares,
            excluded,
            created_at: now,
            updated_at: now,
        }
    }

    /// Share owed by `member`, zero when they hold no entry.
    pub fn share_of(&self, member: &str) -> f64 {
        self.shares.get(member).copied().unwrap_or(0.0)
    }

    pub fn shares_total(&self) -> f64 {
        self.shares.values().sum()
    }

    pub fn has_nonzero_share(&self) -> bool {
        self.shares.values().any(|share| *share > 0.0)
    }

    /// Recovers the percentage each member carries, e.g. to prefill an edit.
    pub fn percentages(&self) -> BTreeMap<String, f64> {
        if self.amount <= 0.0 {
            return BTreeMap::new();
        }
        self.shares
            .iter()
            .map(|(member, share)| (member.clone(), share / self.amount * 100.0))
            .collect()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Identifiable for Expense {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Expense {
    fn name(&self) -> &str {
        &self.description
    }
}

impl Displayable for Expense {
    fn display_label(&self) -> String {
        format!("{} ({:.2}, paid by {})", self.description, self.amount, self.paid_by)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dinner() -> Expense {
        let shares: Shares = [("Alice".to_string(), 70.0), ("Bob".to_string(), 30.0)]
            .into_iter()
            .collect();
        Expense::new(
            "Dinner",
            100.0,
            "Bob",
            Distribution::Percentage,
            shares,
            BTreeSet::new(),
        )
    }

    #[test]
    fn percentages_are_recovered_from_shares() {
        let expense = dinner();
        let percentages = expense.percentages();
        assert!((percentages["Alice"] - 70.0).abs() < 1e-9);
        assert!((percentages["Bob"] - 30.0).abs() < 1e-9);
    }

    #[test]
    fn missing_share_reads_as_zero() {
        let expense = dinner();
        assert_eq!(expense.share_of("Carol"), 0.0);
        assert!(expense.has_nonzero_share());
    }

    #[test]
    fn distribution_serializes_lowercase() {
        let json = serde_json::to_string(&Distribution::Percentage).unwrap();
        assert_eq!(json, "\"percentage\"");
    }

    #[test]
    fn draft_builder_collects_exclusions() {
        let draft = ExpenseDraft::equal("Taxi", 30.0, "Alice").excluding(["Carol"]);
        assert!(draft.excluded.contains("Carol"));
        assert_eq!(draft.rule.distribution(), Distribution::Equal);
    }
}
