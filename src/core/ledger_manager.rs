use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};
use uuid::Uuid;

use crate::core::services::{
    ExpenseService, GroupService, MemberRemoval, ServiceError, ServiceResult, SettlementReport,
    SettlementService,
};
use crate::domain::{
    document::LedgerDocument,
    expense::{Expense, ExpenseDraft},
    group::Group,
    settlement::{BalanceSheet, Transaction},
};
use crate::storage::{integrity_warnings, StorageBackend};

/// Facade that runs every operation as load, validate and mutate, then save.
///
/// A rejected operation never reaches the backend, so the stored document
/// only ever holds validated state.
pub struct LedgerManager {
    storage: Box<dyn StorageBackend>,
}

impl LedgerManager {
    pub fn new(storage: Box<dyn StorageBackend>) -> Self {
        Self { storage }
    }

    /// Current stored document.
    pub fn document(&self) -> ServiceResult<LedgerDocument> {
        Ok(self.storage.load()?)
    }

    fn mutate<T, F>(&self, operation: &str, apply: F) -> ServiceResult<T>
    where
        F: FnOnce(&mut LedgerDocument) -> ServiceResult<T>,
    {
        let mut document = self.storage.load()?;
        let outcome = apply(&mut document)?;
        document.touch();
        self.storage.save(&document)?;
        debug!(operation, groups = document.groups.len(), "ledger saved");
        Ok(outcome)
    }

    fn read<T, F>(&self, view: F) -> ServiceResult<T>
    where
        F: FnOnce(&LedgerDocument) -> T,
    {
        let document = self.storage.load()?;
        Ok(view(&document))
    }

    pub fn create_group(&self, name: &str, members: &[String]) -> ServiceResult<Group> {
        self.mutate("create_group", |document| {
            let id = GroupService::create(document, name, members)?;
            GroupService::get(document, id).cloned()
        })
    }

    pub fn delete_group(&self, group_id: Uuid) -> ServiceResult<Group> {
        self.mutate("delete_group", |document| {
            GroupService::delete(document, group_id)
        })
    }

    pub fn rename_group(&self, group_id: Uuid, name: &str) -> ServiceResult<()> {
        self.mutate("rename_group", |document| {
            GroupService::rename(document, group_id, name)
        })
    }

    pub fn add_member(&self, group_id: Uuid, name: &str) -> ServiceResult<()> {
        self.mutate("add_member", |document| {
            GroupService::add_member(document, group_id, name)
        })
    }

    pub fn remove_member(&self, group_id: Uuid, name: &str) -> ServiceResult<MemberRemoval> {
        self.mutate("remove_member", |document| {
            GroupService::remove_member(document, group_id, name)
        })
    }

    pub fn add_expense(&self, group_id: Uuid, draft: ExpenseDraft) -> ServiceResult<Expense> {
        self.mutate("add_expense", |document| {
            let id = ExpenseService::add(document, group_id, draft)?;
            Self::expense_in(document, group_id, id)
        })
    }

    pub fn update_expense(
        &self,
        group_id: Uuid,
        expense_id: Uuid,
        draft: ExpenseDraft,
    ) -> ServiceResult<Expense> {
        self.mutate("update_expense", |document| {
            ExpenseService::update(document, group_id, expense_id, draft)?;
            Self::expense_in(document, group_id, expense_id)
        })
    }

    pub fn delete_expense(&self, group_id: Uuid, expense_id: Uuid) -> ServiceResult<Expense> {
        self.mutate("delete_expense", |document| {
            ExpenseService::remove(document, group_id, expense_id)
        })
    }

    pub fn list_groups(&self) -> ServiceResult<Vec<Group>> {
        self.read(|document| document.groups.clone())
    }

    pub fn group(&self, group_id: Uuid) -> ServiceResult<Group> {
        let document = self.storage.load()?;
        GroupService::get(&document, group_id).cloned()
    }

    pub fn find_group(&self, query: &str) -> ServiceResult<Option<Group>> {
        self.read(|document| GroupService::find(document, query).cloned())
    }

    pub fn expenses(&self, group_id: Uuid) -> ServiceResult<Vec<Expense>> {
        self.read(|document| {
            ExpenseService::list(document, group_id)
                .into_iter()
                .cloned()
                .collect()
        })
    }

    pub fn balances(&self, group_id: Uuid) -> ServiceResult<BalanceSheet> {
        self.read(|document| SettlementService::balances_for(document, group_id))
    }

    pub fn settlement(&self, group_id: Uuid) -> ServiceResult<Vec<Transaction>> {
        self.read(|document| SettlementService::settlement_for(document, group_id))
    }

    pub fn report(&self, group_id: Uuid) -> ServiceResult<SettlementReport> {
        let group = self.group(group_id)?;
        Ok(SettlementService::report(&group))
    }

    pub fn suggest_percentages(
        &self,
        group_id: Uuid,
        excluded: &BTreeSet<String>,
    ) -> ServiceResult<BTreeMap<String, f64>> {
        let group = self.group(group_id)?;
        Ok(ExpenseService::suggest_percentages(&group, excluded))
    }

    pub fn warnings(&self) -> ServiceResult<Vec<String>> {
        self.read(integrity_warnings)
    }

    pub fn list_backups(&self) -> ServiceResult<Vec<String>> {
        Ok(self.storage.list_backups()?)
    }

    pub fn backup(&self, note: Option<&str>) -> ServiceResult<Option<String>> {
        let created = self.storage.backup(note)?;
        if let Some(name) = created.as_deref() {
            info!(backup = %name, "manual backup created");
        }
        Ok(created)
    }

    pub fn restore_backup(&self, backup_name: &str) -> ServiceResult<LedgerDocument> {
        Ok(self.storage.restore(backup_name)?)
    }

    fn expense_in(
        document: &LedgerDocument,
        group_id: Uuid,
        expense_id: Uuid,
    ) -> ServiceResult<Expense> {
        GroupService::get(document, group_id)?
            .expense(expense_id)
            .cloned()
            .ok_or_else(|| ServiceError::ExpenseNotFound(expense_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ValidationError;
    use crate::storage::MemoryStorage;

    fn manager() -> LedgerManager {
        LedgerManager::new(Box::new(MemoryStorage::new()))
    }

    fn members(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn mutations_are_persisted() {
        let manager = manager();
        let group = manager
            .create_group("Trip", &members(&["Alice", "Bob"]))
            .unwrap();
        manager
            .add_expense(group.id, ExpenseDraft::equal("Fuel", 50.0, "Bob"))
            .unwrap();

        let stored = manager.document().unwrap();
        assert_eq!(stored.groups.len(), 1);
        assert_eq!(stored.groups[0].expenses.len(), 1);
        assert_eq!(
            manager.settlement(group.id).unwrap(),
            vec![Transaction::new("Alice", "Bob", 25.0)]
        );
    }

    #[test]
    fn rejected_operation_leaves_store_untouched() {
        let manager = manager();
        let group = manager
            .create_group("Trip", &members(&["Alice", "Bob"]))
            .unwrap();
        let before = manager.document().unwrap();

        let err = manager
            .add_expense(group.id, ExpenseDraft::equal("Fuel", 0.0, "Bob"))
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::NonPositiveAmount(_))
        ));
        assert_eq!(manager.document().unwrap(), before);
    }

    #[test]
    fn missing_group_reads_are_empty() {
        let manager = manager();
        let id = Uuid::new_v4();
        assert!(manager.balances(id).unwrap().is_empty());
        assert!(manager.settlement(id).unwrap().is_empty());
        assert!(manager.expenses(id).unwrap().is_empty());
        assert!(manager.group(id).unwrap_err().is_not_found());
    }

    #[test]
    fn seeded_document_is_served() {
        let mut document = LedgerDocument::default();
        let id = GroupService::create(&mut document, "Seeded", &members(&["Ann", "Ben"])).unwrap();
        let manager = LedgerManager::new(Box::new(MemoryStorage::with_document(document)));
        assert_eq!(manager.group(id).unwrap().name, "Seeded");
        assert!(manager.warnings().unwrap().is_empty());
    }

    #[test]
    fn memory_backend_has_no_backups() {
        let manager = manager();
        assert!(manager.list_backups().unwrap().is_empty());
        assert_eq!(manager.backup(Some("note")).unwrap(), None);
        assert!(manager.restore_backup("ledger_x.json").is_err());
    }
}
