use crate::core::ledger::{TransactionRow, TransactionStore, TransactionTable};
use anyhow::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// Memoizes successfully loaded tables by location.
///
/// Meant to live for a single batch of queries; it never notices changes to
/// the underlying data.
pub struct CachingTransactionStore<T: TransactionStore> {
    inner: T,
    cache: Mutex<HashMap<PathBuf, TransactionTable>>,
}

impl<T: TransactionStore> CachingTransactionStore<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }
}

impl<T: TransactionStore> TransactionStore for CachingTransactionStore<T> {
    fn load(&self, location: &Path) -> Result<TransactionTable> {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(table) = cache.get(location) {
            debug!("Cache hit for table: {}", location.display());
            return Ok(table.clone());
        }
        debug!("Cache miss for table: {}", location.display());
        let table = self.inner.load(location)?;
        cache.insert(location.to_path_buf(), table.clone());
        Ok(table)
    }

    fn has_member_column(&self, table: &TransactionTable, member: &str) -> bool {
        self.inner.has_member_column(table, member)
    }

    fn rows_for_member<'t>(
        &self,
        table: &'t TransactionTable,
        member: &str,
    ) -> Vec<&'t TransactionRow> {
        self.inner.rows_for_member(table, member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockInnerStore {
        call_count: AtomicUsize,
    }

    impl MockInnerStore {
        fn new() -> Self {
            Self {
                call_count: AtomicUsize::new(0),
            }
        }
    }

    impl TransactionStore for MockInnerStore {
        fn load(&self, location: &Path) -> Result<TransactionTable> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            if location == Path::new("flat.csv") {
                Ok(TransactionTable {
                    members: vec!["Alice".to_string()],
                    rows: vec![],
                })
            } else {
                Err(anyhow!("Unknown location"))
            }
        }
    }

    #[test]
    fn test_caching_store() {
        let inner = MockInnerStore::new();
        let caching = CachingTransactionStore::new(&inner);

        // First call - should hit inner store
        let table = caching.load(Path::new("flat.csv")).unwrap();
        assert_eq!(table.members, vec!["Alice".to_string()]);
        assert_eq!(inner.call_count.load(Ordering::SeqCst), 1);

        // Second call - should be cached
        caching.load(Path::new("flat.csv")).unwrap();
        assert_eq!(inner.call_count.load(Ordering::SeqCst), 1);

        // Failures are not cached
        assert!(caching.load(Path::new("trip.csv")).is_err());
        assert!(caching.load(Path::new("trip.csv")).is_err());
        assert_eq!(inner.call_count.load(Ordering::SeqCst), 3);
    }
}
