pub mod common;
pub mod document;
pub mod expense;
pub mod group;
pub mod settlement;

pub use common::{Displayable, Identifiable, NamedEntity};
pub use document::{LedgerDocument, CURRENT_SCHEMA_VERSION};
pub use expense::{Distribution, Expense, ExpenseDraft, Shares, SplitRule};
pub use group::Group;
pub use settlement::{BalanceSheet, MemberBalance, Transaction};
