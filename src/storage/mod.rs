pub mod json_backend;
pub mod memory;

use crate::{domain::document::LedgerDocument, errors::LedgerError, ledger::money::approx_eq};

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Abstraction over backends that persist the whole ledger document at once.
pub trait StorageBackend: Send + Sync {
    /// Loads the stored document, or an empty one when nothing was saved yet.
    fn load(&self) -> Result<LedgerDocument>;
    fn save(&self, document: &LedgerDocument) -> Result<()>;

    /// Backup names, newest first. Backends without history report none.
    fn list_backups(&self) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    fn backup(&self, _note: Option<&str>) -> Result<Option<String>> {
        Ok(None)
    }

    fn restore(&self, backup_name: &str) -> Result<LedgerDocument> {
        Err(LedgerError::Persistence(format!(
            "backup `{}` not available for this backend",
            backup_name
        )))
    }
}

pub use json_backend::JsonStorage;
pub use memory::MemoryStorage;

/// Inconsistencies found in a loaded document. Balances skip the offending
/// entries, so these are reported rather than rejected.
pub fn integrity_warnings(document: &LedgerDocument) -> Vec<String> {
    let mut warnings = Vec::new();
    for group in &document.groups {
        for expense in &group.expenses {
            if !group.has_member(&expense.paid_by) {
                warnings.push(format!(
                    "expense {} in group `{}` is paid by unknown member `{}`",
                    expense.id, group.name, expense.paid_by
                ));
            }
            for member in expense.shares.keys() {
                if !group.has_member(member) {
                    warnings.push(format!(
                        "expense {} in group `{}` assigns a share to unknown member `{}`",
                        expense.id, group.name, member
                    ));
                }
            }
            if !expense.has_nonzero_share() {
                warnings.push(format!(
                    "expense {} in group `{}` has no member owing a share",
                    expense.id, group.name
                ));
            } else if !approx_eq(expense.shares_total(), expense.amount) {
                warnings.push(format!(
                    "expense {} in group `{}` has shares totalling {:.2} for amount {:.2}",
                    expense.id,
                    group.name,
                    expense.shares_total(),
                    expense.amount
                ));
            }
        }
    }
    warnings
}
