use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::group::Group;

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

/// The whole persisted state: every group with its expenses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerDocument {
    #[serde(default = "LedgerDocument::schema_version_default")]
    pub schema_version: u8,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub groups: Vec<Group>,
}

impl Default for LedgerDocument {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            updated_at: Utc::now(),
            groups: Vec::new(),
        }
    }
}

impl LedgerDocument {
    pub fn group(&self, id: Uuid) -> Option<&Group> {
        self.groups.iter().find(|group| group.id == id)
    }

    pub fn group_mut(&mut self, id: Uuid) -> Option<&mut Group> {
        self.groups.iter_mut().find(|group| group.id == id)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}
