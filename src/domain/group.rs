use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;
use crate::domain::expense::Expense;

/// A set of people sharing expenses. Owns its expenses exclusively.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Group {
    /// Creates a group without validating names; services do that first.
    pub fn new(name: impl Into<String>, members: Vec<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            members,
            expenses: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_member(&self, name: &str) -> bool {
        self.members.iter().any(|member| member == name)
    }

    pub fn expense(&self, id: Uuid) -> Option<&Expense> {
        self.expenses.iter().find(|expense| expense.id == id)
    }

    pub fn expense_mut(&mut self, id: Uuid) -> Option<&mut Expense> {
        self.expenses.iter_mut().find(|expense| expense.id == id)
    }

    pub fn add_expense(&mut self, expense: Expense) -> Uuid {
        let id = expense.id;
        self.expenses.push(expense);
        self.touch();
        id
    }

    pub fn remove_expense(&mut self, id: Uuid) -> Option<Expense> {
        let index = self.expenses.iter().position(|expense| expense.id == id)?;
        let removed = self.expenses.remove(index);
        self.touch();
        Some(removed)
    }

    /// Resolves an expense from a full id or a unique id prefix.
    pub fn find_expense(&self, query: &str) -> Option<&Expense> {
        let needle = query.trim().to_ascii_lowercase();
        if needle.is_empty() {
            return None;
        }
        let mut matches = self.expenses.iter().filter(|expense| {
            expense.id.to_string().starts_with(&needle)
                || expense.id.simple().to_string().starts_with(&needle)
        });
        let first = matches.next()?;
        match matches.next() {
            Some(_) => None,
            None => Some(first),
        }
    }

    pub fn total_spent(&self) -> f64 {
        self.expenses.iter().map(|expense| expense.amount).sum()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Identifiable for Group {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Group {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Group {
    fn display_label(&self) -> String {
        format!(
            "{} ({} members, {} expenses)",
            self.name,
            self.members.len(),
            self.expenses.len()
        )
    }
}
