use thiserror::Error;

/// Error type that captures persistence failures for the ledger document.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Persistence error: {0}")]
    Persistence(String),
}

/// Rejections raised before any shares are produced or any state is mutated.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("amount must be a positive number, got {0}")]
    NonPositiveAmount(f64),
    #[error("description must not be empty")]
    EmptyDescription,
    #[error("group name must not be empty")]
    EmptyGroupName,
    #[error("a group needs at least one member")]
    NoMembers,
    #[error("member name must not be empty")]
    EmptyMemberName,
    #[error("member `{0}` already exists")]
    DuplicateMember(String),
    #[error("`{0}` is not a member of this group")]
    UnknownMember(String),
    #[error("at least one member must be included in the expense")]
    NoIncludedMembers,
    #[error("percentage for `{member}` must be between 0 and 100, got {value}")]
    PercentageOutOfRange { member: String, value: f64 },
    #[error("percentages must total 100%, got {total:.2}%")]
    PercentageTotal { total: f64 },
}
