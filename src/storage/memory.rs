use std::sync::RwLock;

use crate::{domain::document::LedgerDocument, errors::LedgerError};

use super::{Result, StorageBackend};

/// Keeps the document in memory. Used by tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    document: RwLock<LedgerDocument>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: LedgerDocument) -> Self {
        Self {
            document: RwLock::new(document),
        }
    }
}

impl StorageBackend for MemoryStorage {
    fn load(&self) -> Result<LedgerDocument> {
        self.document
            .read()
            .map(|document| document.clone())
            .map_err(|_| LedgerError::Persistence("in-memory ledger lock poisoned".into()))
    }

    fn save(&self, document: &LedgerDocument) -> Result<()> {
        let mut guard = self
            .document
            .write()
            .map_err(|_| LedgerError::Persistence("in-memory ledger lock poisoned".into()))?;
        *guard = document.clone();
        Ok(())
    }
}
