use super::TableStore;
use crate::error::{ButlerError, Result};
use crate::model::Item;
use crate::query::TableQuery;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

type Partition = BTreeMap<String, Item>;
type Table = HashMap<String, Partition>;

/// In-memory table store for testing and development.
/// Does NOT persist data.
///
/// Failure injection flags let tests drive the error paths of callers.
#[derive(Default)]
pub struct MemTableStore {
    tables: RwLock<HashMap<String, Table>>,
    simulate_create_error: AtomicBool,
    simulate_write_error: AtomicBool,
}

impl MemTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `create_table_if_not_exists` fail.
    pub fn set_simulate_create_error(&self, simulate: bool) {
        self.simulate_create_error.store(simulate, Ordering::SeqCst);
    }

    /// Make `insert_entity` and `replace_entity` fail.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.store(simulate, Ordering::SeqCst);
    }

    /// Number of rows in `table` across all partitions.
    pub fn row_count(&self, table: &str) -> usize {
        self.tables
            .read()
            .get(table)
            .map(|t| t.values().map(|p| p.len()).sum())
            .unwrap_or(0)
    }

    fn check_write(&self) -> Result<()> {
        if self.simulate_write_error.load(Ordering::SeqCst) {
            return Err(ButlerError::Store("Simulated write error".to_string()));
        }
        Ok(())
    }
}

fn row_not_found(table: &str, partition_key: &str, row_key: &str) -> ButlerError {
    ButlerError::RowNotFound {
        table: table.to_string(),
        partition_key: partition_key.to_string(),
        row_key: row_key.to_string(),
    }
}

#[async_trait]
impl TableStore for MemTableStore {
    async fn create_table_if_not_exists(&self, table: &str) -> Result<bool> {
        if self.simulate_create_error.load(Ordering::SeqCst) {
            return Err(ButlerError::TableCreation {
                table: table.to_string(),
                reason: "Simulated create error".to_string(),
            });
        }
        let mut tables = self.tables.write();
        if tables.contains_key(table) {
            return Ok(false);
        }
        tables.insert(table.to_string(), Table::new());
        Ok(true)
    }

    async fn table_exists(&self, table: &str) -> Result<bool> {
        Ok(self.tables.read().contains_key(table))
    }

    async fn query_entities(
        &self,
        table: &str,
        partition_key: &str,
        query: &TableQuery,
    ) -> Result<Vec<Item>> {
        let tables = self.tables.read();
        let rows = tables
            .get(table)
            .ok_or_else(|| ButlerError::TableNotFound(table.to_string()))?;
        Ok(rows
            .get(partition_key)
            .map(|partition| {
                partition
                    .values()
                    .filter(|item| query.matches(item))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn insert_entity(&self, table: &str, item: &Item) -> Result<()> {
        self.check_write()?;
        let mut tables = self.tables.write();
        let rows = tables
            .get_mut(table)
            .ok_or_else(|| ButlerError::TableNotFound(table.to_string()))?;
        let partition = rows.entry(item.partition_key.clone()).or_default();
        if partition.contains_key(&item.row_key) {
            return Err(ButlerError::RowExists {
                table: table.to_string(),
                partition_key: item.partition_key.clone(),
                row_key: item.row_key.clone(),
            });
        }
        let mut stored = item.clone();
        stored.timestamp = Some(Utc::now());
        partition.insert(stored.row_key.clone(), stored);
        Ok(())
    }

    async fn retrieve_entity(
        &self,
        table: &str,
        partition_key: &str,
        row_key: &str,
    ) -> Result<Item> {
        let tables = self.tables.read();
        let rows = tables
            .get(table)
            .ok_or_else(|| ButlerError::TableNotFound(table.to_string()))?;
        rows.get(partition_key)
            .and_then(|partition| partition.get(row_key))
            .cloned()
            .ok_or_else(|| row_not_found(table, partition_key, row_key))
    }

    async fn replace_entity(&self, table: &str, item: &Item) -> Result<()> {
        self.check_write()?;
        let mut tables = self.tables.write();
        let rows = tables
            .get_mut(table)
            .ok_or_else(|| ButlerError::TableNotFound(table.to_string()))?;
        let existing = rows
            .get_mut(&item.partition_key)
            .and_then(|partition| partition.get_mut(&item.row_key))
            .ok_or_else(|| row_not_found(table, &item.partition_key, &item.row_key))?;
        *existing = item.clone();
        existing.timestamp = Some(Utc::now());
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::ItemFields;
    use std::sync::Arc;

    pub const TABLE: &str = "butlerbod";

    pub struct StoreFixture {
        pub store: Arc<MemTableStore>,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: Arc::new(MemTableStore::new()),
            }
        }

        /// Seeds `count` rows into `partition_key` of the fixture table.
        pub async fn with_items(self, count: usize, partition_key: &str) -> Self {
            self.store.create_table_if_not_exists(TABLE).await.unwrap();
            for i in 0..count {
                let fields = ItemFields::new(format!("Item {}", i + 1), format!("Note {}", i + 1));
                let item = Item::new(partition_key, fields);
                self.store.insert_entity(TABLE, &item).await.unwrap();
            }
            self
        }
    }
}
