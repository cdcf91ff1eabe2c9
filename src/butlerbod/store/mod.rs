//! # Storage Layer
//!
//! This module defines the boundary between butlerbod and the table store that
//! owns the data. The [`TableStore`] trait lists exactly the capabilities
//! [`TableCollection`](crate::collection::TableCollection) needs:
//!
//! - create a table if it does not exist yet
//! - query the rows of one partition with a [`TableQuery`]
//! - insert a new row
//! - point lookup by partition key and row key
//! - replace an existing row in full
//!
//! ## Tables, Partitions, Rows
//!
//! A table holds rows grouped by partition key. Within a partition the row key
//! is unique. Rooms and types live in the same table by default and are told
//! apart only by partition key.
//!
//! ## Write Semantics
//!
//! Every write is a whole-row write. The store stamps `Timestamp` on insert
//! and replace. There is no ETag or version check: concurrent replaces of the
//! same row race and the last one to land wins.
//!
//! ## Implementations
//!
//! - [`memory::MemTableStore`]: In-memory tables for tests and development,
//!   with failure injection.
//! - [`fs::FsTableStore`]: One JSON file per table under a data directory.
//!
//! ## Storage Layout
//!
//! For `FsTableStore`:
//! ```text
//! <data dir>/
//! ├── config.json             # ButlerConfig
//! └── tables/
//!     └── {table}.json        # { partition: { row_key: Item } }
//! ```

use crate::error::Result;
use crate::model::Item;
use crate::query::TableQuery;
use async_trait::async_trait;

pub mod fs;
pub mod memory;

/// Abstract interface to a partitioned table store.
///
/// Errors are returned as-is to callers; implementations must not retry.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Create `table` if missing. Returns `true` if it was created by this call.
    async fn create_table_if_not_exists(&self, table: &str) -> Result<bool>;

    async fn table_exists(&self, table: &str) -> Result<bool>;

    /// All rows of `partition_key` matching `query`, ordered by row key.
    async fn query_entities(
        &self,
        table: &str,
        partition_key: &str,
        query: &TableQuery,
    ) -> Result<Vec<Item>>;

    /// Insert a row. Fails with `RowExists` if the key pair is taken.
    async fn insert_entity(&self, table: &str, item: &Item) -> Result<()>;

    /// Fails with `RowNotFound` if there is no such row.
    async fn retrieve_entity(
        &self,
        table: &str,
        partition_key: &str,
        row_key: &str,
    ) -> Result<Item>;

    /// Overwrite an existing row in full. Fails with `RowNotFound` if absent.
    async fn replace_entity(&self, table: &str, item: &Item) -> Result<()>;
}
