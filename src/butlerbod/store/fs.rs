use super::TableStore;
use crate::error::{ButlerError, Result};
use crate::model::Item;
use crate::query::TableQuery;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::Mutex;

type Partitions = BTreeMap<String, BTreeMap<String, Item>>;

const TABLES_DIR: &str = "tables";

/// Table store keeping one JSON file per table.
///
/// Writes are read-modify-write of the whole table file, serialized within the
/// process by `write_lock`, and land atomically via a temp file and rename.
/// Nothing coordinates separate processes sharing a data dir.
pub struct FsTableStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl FsTableStore {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            write_lock: Mutex::new(()),
        }
    }

    fn tables_dir(&self) -> PathBuf {
        self.root.join(TABLES_DIR)
    }

    fn table_path(&self, table: &str) -> Result<PathBuf> {
        validate_table_name(table)?;
        Ok(self.tables_dir().join(format!("{}.json", table)))
    }

    async fn load_table(&self, table: &str) -> Result<Partitions> {
        let path = self.table_path(table)?;
        if !fs::try_exists(&path).await? {
            return Err(ButlerError::TableNotFound(table.to_string()));
        }
        let content = fs::read_to_string(&path).await?;
        let partitions: Partitions = serde_json::from_str(&content)?;
        Ok(partitions)
    }

    async fn save_table(&self, table: &str, partitions: &Partitions) -> Result<()> {
        let path = self.table_path(table)?;
        let tmp = path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(partitions)?;
        fs::write(&tmp, content).await?;
        fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

/// Table names follow the usual table-service rule: 3 to 63 ASCII
/// alphanumerics, starting with a letter.
fn validate_table_name(table: &str) -> Result<()> {
    let valid = (3..=63).contains(&table.len())
        && table.starts_with(|c: char| c.is_ascii_alphabetic())
        && table.chars().all(|c| c.is_ascii_alphanumeric());
    if valid {
        Ok(())
    } else {
        Err(ButlerError::Store(format!("Invalid table name: {:?}", table)))
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
impl TableStore for FsTableStore {
    async fn create_table_if_not_exists(&self, table: &str) -> Result<bool> {
        let path = self
            .table_path(table)
            .map_err(|e| ButlerError::TableCreation {
                table: table.to_string(),
                reason: e.to_string(),
            })?;
        let _guard = self.write_lock.lock().await;
        if fs::try_exists(&path).await? {
            return Ok(false);
        }
        fs::create_dir_all(self.tables_dir()).await?;
        self.save_table(table, &Partitions::new()).await?;
        Ok(true)
    }

    async fn table_exists(&self, table: &str) -> Result<bool> {
        let path = self.table_path(table)?;
        Ok(fs::try_exists(&path).await?)
    }

    async fn query_entities(
        &self,
        table: &str,
        partition_key: &str,
        query: &TableQuery,
    ) -> Result<Vec<Item>> {
        let partitions = self.load_table(table).await?;
        Ok(partitions
            .get(partition_key)
            .map(|rows| {
                rows.values()
                    .filter(|item| query.matches(item))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn insert_entity(&self, table: &str, item: &Item) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut partitions = self.load_table(table).await?;
        let rows = partitions.entry(item.partition_key.clone()).or_default();
        if rows.contains_key(&item.row_key) {
            return Err(ButlerError::RowExists {
                table: table.to_string(),
                partition_key: item.partition_key.clone(),
                row_key: item.row_key.clone(),
            });
        }
        let mut stored = item.clone();
        stored.timestamp = Some(Utc::now());
        rows.insert(stored.row_key.clone(), stored);
        self.save_table(table, &partitions).await
    }

    async fn retrieve_entity(
        &self,
        table: &str,
        partition_key: &str,
        row_key: &str,
    ) -> Result<Item> {
        let partitions = self.load_table(table).await?;
        partitions
            .get(partition_key)
            .and_then(|rows| rows.get(row_key))
            .cloned()
            .ok_or_else(|| row_not_found(table, partition_key, row_key))
    }

    async fn replace_entity(&self, table: &str, item: &Item) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut partitions = self.load_table(table).await?;
        let existing = partitions
            .get_mut(&item.partition_key)
            .and_then(|rows| rows.get_mut(&item.row_key))
            .ok_or_else(|| row_not_found(table, &item.partition_key, &item.row_key))?;
        *existing = item.clone();
        existing.timestamp = Some(Utc::now());
        self.save_table(table, &partitions).await
    }
}
