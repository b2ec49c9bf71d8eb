use crate::core::ledger::{TransactionStore, TransactionTable};
use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Transaction tables held in memory, keyed by location.
#[derive(Debug, Default, Clone)]
pub struct MemoryTransactionStore {
    tables: HashMap<PathBuf, Result<TransactionTable, String>>,
}

impl MemoryTransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, location: impl Into<PathBuf>, table: TransactionTable) {
        self.tables.insert(location.into(), Ok(table));
    }

    /// Makes every load of `location` fail with `reason`.
    pub fn fail(&mut self, location: impl Into<PathBuf>, reason: &str) {
        self.tables.insert(location.into(), Err(reason.to_string()));
    }
}

impl TransactionStore for MemoryTransactionStore {
    fn load(&self, location: &Path) -> Result<TransactionTable> {
        debug!("Loading in-memory table for {}", location.display());
        match self.tables.get(location) {
            Some(Ok(table)) => Ok(table.clone()),
            Some(Err(reason)) => Err(anyhow!(reason.clone())),
            None => Err(anyhow!("No transaction table at {}", location.display())),
        }
    }
}
