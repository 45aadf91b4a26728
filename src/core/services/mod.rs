pub mod expense_service;
pub mod group_service;
pub mod settlement_service;

pub use expense_service::ExpenseService;
pub use group_service::{GroupService, MemberRemoval};
pub use settlement_service::{SettlementReport, SettlementService};

use crate::errors::{LedgerError, ValidationError};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Group not found: {0}")]
    GroupNotFound(String),
    #[error("Expense not found: {0}")]
    ExpenseNotFound(String),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ServiceError::GroupNotFound(_) | ServiceError::ExpenseNotFound(_)
        )
    }
}
