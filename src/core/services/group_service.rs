//! Group and membership management over a ledger document.

use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{document::LedgerDocument, group::Group};
use crate::errors::ValidationError;
use crate::ledger::money::approx_eq;

use super::{ServiceError, ServiceResult};

/// Outcome of removing a member from a group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberRemoval {
    pub member: String,
    /// Expenses deleted because the member paid them or nobody was left owing.
    pub dropped_expenses: Vec<Uuid>,
    /// Expenses whose remaining shares were rescaled to cover the amount.
    pub rebalanced_expenses: Vec<Uuid>,
}

pub struct GroupService;

impl GroupService {
    /// Creates a group from trimmed names and returns its identifier.
    pub fn create(
        document: &mut LedgerDocument,
        name: &str,
        members: &[String],
    ) -> ServiceResult<Uuid> {
        let name = Self::validate_group_name(name)?;
        if members.is_empty() {
            return Err(ValidationError::NoMembers.into());
        }
        let mut unique: Vec<String> = Vec::with_capacity(members.len());
        for raw in members {
            let member = Self::validate_member_name(&unique, raw)?;
            unique.push(member);
        }

        let group = Group::new(name, unique);
        let id = group.id;
        info!(group = %id, name = %group.name, members = group.members.len(), "group created");
        document.groups.push(group);
        document.touch();
        Ok(id)
    }

    /// Deletes the group together with every expense it owns.
    pub fn delete(document: &mut LedgerDocument, id: Uuid) -> ServiceResult<Group> {
        let index = document
            .groups
            .iter()
            .position(|group| group.id == id)
            .ok_or_else(|| ServiceError::GroupNotFound(id.to_string()))?;
        let removed = document.groups.remove(index);
        document.touch();
        info!(group = %id, expenses = removed.expenses.len(), "group deleted");
        Ok(removed)
    }

    pub fn rename(document: &mut LedgerDocument, id: Uuid, name: &str) -> ServiceResult<()> {
        let name = Self::validate_group_name(name)?;
        let group = Self::get_mut(document, id)?;
        group.name = name;
        group.touch();
        document.touch();
        Ok(())
    }

    pub fn add_member(document: &mut LedgerDocument, id: Uuid, name: &str) -> ServiceResult<()> {
        let group = Self::get_mut(document, id)?;
        let member = Self::validate_member_name(&group.members, name)?;
        info!(group = %id, member = %member, "member added");
        group.members.push(member);
        group.touch();
        document.touch();
        Ok(())
    }

    /// Removes `name` from the group and repairs every expense that referenced
    /// them so each surviving expense only involves current members.
    ///
    /// Expenses the member paid are dropped. Elsewhere their share is removed
    /// and the remaining shares are scaled back up to the expense amount;
    /// expenses left with no positive share are dropped.
    pub fn remove_member(
        document: &mut LedgerDocument,
        id: Uuid,
        name: &str,
    ) -> ServiceResult<MemberRemoval> {
        let group = Self::get_mut(document, id)?;
        let name = name.trim();
        let index = group
            .members
            .iter()
            .position(|member| member == name)
            .ok_or_else(|| ValidationError::UnknownMember(name.to_string()))?;
        group.members.remove(index);

        let mut report = MemberRemoval {
            member: name.to_string(),
            ..MemberRemoval::default()
        };
        let members = group.members.clone();

        group.expenses.retain_mut(|expense| {
            if expense.paid_by == name || !members.contains(&expense.paid_by) {
                report.dropped_expenses.push(expense.id);
                return false;
            }
            expense.excluded.retain(|member| members.contains(member));
            let stripped = expense.shares.remove(name).unwrap_or(0.0);
            expense.shares.retain(|member, _| members.contains(member));
            if !expense.has_nonzero_share() {
                report.dropped_expenses.push(expense.id);
                return false;
            }
            let total = expense.shares_total();
            if stripped > 0.0 || !approx_eq(total, expense.amount) {
                let factor = expense.amount / total;
                for share in expense.shares.values_mut() {
                    *share *= factor;
                }
                expense.touch();
                report.rebalanced_expenses.push(expense.id);
            }
            true
        });

        group.touch();
        document.touch();
        if !report.dropped_expenses.is_empty() {
            warn!(
                group = %id,
                member = %report.member,
                dropped = report.dropped_expenses.len(),
                "expenses dropped while removing member"
            );
        }
        info!(
            group = %id,
            member = %report.member,
            rebalanced = report.rebalanced_expenses.len(),
            "member removed"
        );
        Ok(report)
    }

    pub fn get(document: &LedgerDocument, id: Uuid) -> ServiceResult<&Group> {
        document
            .group(id)
            .ok_or_else(|| ServiceError::GroupNotFound(id.to_string()))
    }

    pub fn get_mut(document: &mut LedgerDocument, id: Uuid) -> ServiceResult<&mut Group> {
        document
            .group_mut(id)
            .ok_or_else(|| ServiceError::GroupNotFound(id.to_string()))
    }

    /// Looks a group up by full id, unique id prefix, or case-insensitive name.
    pub fn find<'a>(document: &'a LedgerDocument, query: &str) -> Option<&'a Group> {
        let needle = query.trim();
        if needle.is_empty() {
            return None;
        }
        if let Some(group) = document
            .groups
            .iter()
            .find(|group| group.name.eq_ignore_ascii_case(needle))
        {
            return Some(group);
        }
        let lowered = needle.to_ascii_lowercase();
        let mut matches = document.groups.iter().filter(|group| {
            group.id.to_string().starts_with(&lowered)
                || group.id.simple().to_string().starts_with(&lowered)
        });
        let first = matches.next()?;
        match matches.next() {
            Some(_) => None,
            None => Some(first),
        }
    }

    pub fn list(document: &LedgerDocument) -> Vec<&Group> {
        document.groups.iter().collect()
    }

    fn validate_group_name(candidate: &str) -> Result<String, ValidationError> {
        let name = candidate.trim();
        if name.is_empty() {
            Err(ValidationError::EmptyGroupName)
        } else {
            Ok(name.to_string())
        }
    }

    fn validate_member_name(existing: &[String], candidate: &str) -> Result<String, ValidationError> {
        let name = candidate.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyMemberName);
        }
        if existing.iter().any(|member| member == name) {
            return Err(ValidationError::DuplicateMember(name.to_string()));
        }
        Ok(name.to_string())
    }
}
