use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::{
    document::LedgerDocument,
    expense::{Expense, ExpenseDraft},
    group::Group,
};
use crate::errors::ValidationError;
use crate::ledger::ShareCalculator;

use super::{GroupService, ServiceError, ServiceResult};

pub struct ExpenseService;

impl ExpenseService {
    /// Validates `draft` against the members of `group` and computes its
    /// shares. Nothing is stored.
    pub fn build(group: &Group, draft: ExpenseDraft) -> Result<Expense, ValidationError> {
        let description = draft.description.trim();
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        let paid_by = draft.paid_by.trim();
        if !group.has_member(paid_by) {
            return Err(ValidationError::UnknownMember(paid_by.to_string()));
        }
        let excluded: BTreeSet<String> = draft
            .excluded
            .iter()
            .map(|name| name.trim().to_string())
            .collect();
        let shares =
            ShareCalculator::compute(draft.amount, &draft.rule, &group.members, &excluded)?;
        Ok(Expense::new(
            description,
            draft.amount,
            paid_by,
            draft.rule.distribution(),
            shares,
            excluded,
        ))
    }

    pub fn add(
        document: &mut LedgerDocument,
        group_id: Uuid,
        draft: ExpenseDraft,
    ) -> ServiceResult<Uuid> {
        let group = GroupService::get_mut(document, group_id)?;
        let expense = Self::build(group, draft)?;
        let id = group.add_expense(expense);
        document.touch();
        info!(group = %group_id, expense = %id, "expense recorded");
        Ok(id)
    }

    /// Replaces the content of an existing expense, keeping its identity.
    pub fn update(
        document: &mut LedgerDocument,
        group_id: Uuid,
        expense_id: Uuid,
        draft: ExpenseDraft,
    ) -> ServiceResult<()> {
        let group = GroupService::get_mut(document, group_id)?;
        let created_at = group
            .expense(expense_id)
            .map(|expense| expense.created_at)
            .ok_or_else(|| ServiceError::ExpenseNotFound(expense_id.to_string()))?;

        let mut rebuilt = Self::build(group, draft)?;
        rebuilt.id = expense_id;
        rebuilt.created_at = created_at;
        rebuilt.updated_at = Utc::now();

        if let Some(slot) = group.expense_mut(expense_id) {
            *slot = rebuilt;
        }
        group.touch();
        document.touch();
        info!(group = %group_id, expense = %expense_id, "expense updated");
        Ok(())
    }

    pub fn remove(
        document: &mut LedgerDocument,
        group_id: Uuid,
        expense_id: Uuid,
    ) -> ServiceResult<Expense> {
        let group = GroupService::get_mut(document, group_id)?;
        let removed = group
            .remove_expense(expense_id)
            .ok_or_else(|| ServiceError::ExpenseNotFound(expense_id.to_string()))?;
        document.touch();
        info!(group = %group_id, expense = %expense_id, "expense deleted");
        Ok(removed)
    }

    /// Expenses of the group in insertion order; empty for an unknown group.
    pub fn list(document: &LedgerDocument, group_id: Uuid) -> Vec<&Expense> {
        match document.group(group_id) {
            Some(group) => group.expenses.iter().collect(),
            None => {
                debug!(group = %group_id, "listing expenses of unknown group");
                Vec::new()
            }
        }
    }

    pub fn suggest_percentages(group: &Group, excluded: &BTreeSet<String>) -> BTreeMap<String, f64> {
        ShareCalculator::suggest_percentages(&group.members, excluded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::expense::Distribution;

    fn setup() -> (LedgerDocument, Uuid) {
        let mut document = LedgerDocument::default();
        let members = vec!["Alice".to_string(), "Bob".to_string(), "Carol".to_string()];
        let id = GroupService::create(&mut document, "Trip", &members).unwrap();
        (document, id)
    }

    #[test]
    fn add_stores_equal_shares() {
        let (mut document, group_id) = setup();
        let id = ExpenseService::add(
            &mut document,
            group_id,
            ExpenseDraft::equal(" Dinner ", 90.0, "Alice"),
        )
        .unwrap();
        let group = document.group(group_id).unwrap();
        let expense = group.expense(id).unwrap();
        assert_eq!(expense.description, "Dinner");
        assert_eq!(expense.distribution, Distribution::Equal);
        assert_eq!(expense.share_of("Carol"), 30.0);
    }

    #[test]
    fn rejects_unknown_payer_and_blank_description() {
        let (mut document, group_id) = setup();
        let err = ExpenseService::add(
            &mut document,
            group_id,
            ExpenseDraft::equal("Taxi", 10.0, "Mallory"),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::UnknownMember(_))
        ));

        let err =
            ExpenseService::add(&mut document, group_id, ExpenseDraft::equal("  ", 10.0, "Bob"))
                .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::EmptyDescription)
        ));
        assert!(document.group(group_id).unwrap().expenses.is_empty());
    }

    #[test]
    fn rejected_percentages_leave_group_untouched() {
        let (mut document, group_id) = setup();
        let draft = ExpenseDraft::percentage(
            "Hotel",
            300.0,
            "Bob",
            [("Alice", 50.0), ("Bob", 30.0), ("Carol", 10.0)],
        );
        let err = ExpenseService::add(&mut document, group_id, draft).unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::PercentageTotal { .. })
        ));
        assert!(document.group(group_id).unwrap().expenses.is_empty());
    }

    #[test]
    fn update_keeps_identity_and_recomputes_shares() {
        let (mut document, group_id) = setup();
        let id = ExpenseService::add(
            &mut document,
            group_id,
            ExpenseDraft::equal("Dinner", 90.0, "Alice"),
        )
        .unwrap();
        let created_at = document.group(group_id).unwrap().expense(id).unwrap().created_at;

        ExpenseService::update(
            &mut document,
            group_id,
            id,
            ExpenseDraft::equal("Dinner", 60.0, "Bob").excluding(["Carol"]),
        )
        .unwrap();

        let group = document.group(group_id).unwrap();
        assert_eq!(group.expenses.len(), 1);
        let expense = group.expense(id).unwrap();
        assert_eq!(expense.created_at, created_at);
        assert_eq!(expense.paid_by, "Bob");
        assert_eq!(expense.share_of("Alice"), 30.0);
        assert!(!expense.shares.contains_key("Carol"));
    }

    #[test]
    fn update_missing_expense_is_not_found() {
        let (mut document, group_id) = setup();
        let err = ExpenseService::update(
            &mut document,
            group_id,
            Uuid::new_v4(),
            ExpenseDraft::equal("Ghost", -1.0, "Nobody"),
        )
        .unwrap_err();
        assert!(matches!(err, ServiceError::ExpenseNotFound(_)));
    }

    #[test]
    fn remove_and_list() {
        let (mut document, group_id) = setup();
        let first =
            ExpenseService::add(&mut document, group_id, ExpenseDraft::equal("A", 3.0, "Alice"))
                .unwrap();
        ExpenseService::add(&mut document, group_id, ExpenseDraft::equal("B", 6.0, "Bob"))
            .unwrap();
        let removed = ExpenseService::remove(&mut document, group_id, first).unwrap();
        assert_eq!(removed.description, "A");

        let listed = ExpenseService::list(&document, group_id);
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].description, "B");
        assert!(ExpenseService::list(&document, Uuid::new_v4()).is_empty());
        assert!(ExpenseService::remove(&mut document, group_id, first)
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn excluded_names_are_trimmed_like_the_payer() {
        let (mut document, group_id) = setup();
        let draft = ExpenseDraft::equal("Taxi", 30.0, " Alice ").excluding([" Carol "]);
        let id = ExpenseService::add(&mut document, group_id, draft).unwrap();
        let expense = document.group(group_id).unwrap().expense(id).unwrap();
        assert!(expense.excluded.contains("Carol"));
        assert!(!expense.shares.contains_key("Carol"));
        assert_eq!(expense.paid_by, "Alice");
    }

    #[test]
    fn suggestions_cover_included_members() {
        let (document, group_id) = setup();
        let group = document.group(group_id).unwrap();
        let excluded: BTreeSet<String> = ["Carol".to_string()].into_iter().collect();
        let suggested = ExpenseService::suggest_percentages(group, &excluded);
        assert_eq!(suggested.len(), 2);
        assert_eq!(suggested["Alice"], 50.0);
    }
}
