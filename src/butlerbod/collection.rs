//! # Table Collections
//!
//! A [`TableCollection`] is one partition of one table, seen as a collection
//! of [`Item`]s. It is the only code that talks to a [`TableStore`].
//!
//! ## Contract
//!
//! - Opening a collection creates its table if missing. If that fails there is
//!   no collection: [`TableCollection::open`] returns the error and callers
//!   must not carry on without the table.
//! - Row keys are generated here, at insert time, and never accepted from the
//!   caller. `add_item` does not hand the new key back; callers that need it
//!   query for the row.
//! - `update_item` fetches the row, overwrites `name` and `note`, and replaces
//!   the row in full. A failed fetch ends the operation before anything is
//!   written. `PartitionKey` and `RowKey` never change.
//! - Store errors come back unchanged. Nothing is retried or rolled back.
//!
//! ## Concurrency
//!
//! The collection holds no mutable state, so any number of tasks may share
//! one. Nothing coordinates concurrent writers of the same row either: two
//! overlapping updates both succeed and the later replace wins.

use crate::error::Result;
use crate::model::{Item, ItemFields};
use crate::query::TableQuery;
use crate::store::TableStore;
use std::sync::Arc;
use tracing::{debug, error, info};

pub struct TableCollection<S: TableStore> {
    store: Arc<S>,
    table_name: String,
    partition_key: String,
}

impl<S: TableStore> Clone for TableCollection<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            table_name: self.table_name.clone(),
            partition_key: self.partition_key.clone(),
        }
    }
}

impl<S: TableStore> TableCollection<S> {
    /// Binds a collection to `table_name`/`partition_key`, creating the table
    /// if it does not exist.
    pub async fn open(
        store: Arc<S>,
        table_name: impl Into<String>,
        partition_key: impl Into<String>,
    ) -> Result<Self> {
        let table_name = table_name.into();
        let partition_key = partition_key.into();

        match store.create_table_if_not_exists(&table_name).await {
            Ok(true) => info!(table = %table_name, "created table"),
            Ok(false) => debug!(table = %table_name, "table already exists"),
            Err(e) => {
                error!(table = %table_name, error = %e, "table creation failed");
                return Err(e);
            }
        }

        Ok(Self {
            store,
            table_name,
            partition_key,
        })
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn partition_key(&self) -> &str {
        &self.partition_key
    }

    /// All items of this partition matching `query`.
    pub async fn find(&self, query: &TableQuery) -> Result<Vec<Item>> {
        debug!(
            table = %self.table_name,
            partition = %self.partition_key,
            conditions = query.conditions().len(),
            "find"
        );
        self.store
            .query_entities(&self.table_name, &self.partition_key, query)
            .await
    }

    pub async fn add_item(&self, fields: ItemFields) -> Result<()> {
        let item = Item::new(&self.partition_key, fields);
        debug!(
            table = %self.table_name,
            partition = %self.partition_key,
            row_key = %item.row_key,
            "add_item"
        );
        self.store.insert_entity(&self.table_name, &item).await
    }

    pub async fn get_item(&self, row_key: &str) -> Result<Item> {
        debug!(
            table = %self.table_name,
            partition = %self.partition_key,
            row_key,
            "get_item"
        );
        self.store
            .retrieve_entity(&self.table_name, &self.partition_key, row_key)
            .await
    }

    pub async fn update_item(&self, row_key: &str, fields: ItemFields) -> Result<()> {
        debug!(
            table = %self.table_name,
            partition = %self.partition_key,
            row_key,
            "update_item"
        );
        let mut item = self.get_item(row_key).await?;
        item.apply(fields);
        self.store.replace_entity(&self.table_name, &item).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ButlerError;
    use crate::query::Field;
    use crate::store::fs::FsTableStore;
    use crate::store::memory::fixtures::{StoreFixture, TABLE};
    use crate::store::memory::MemTableStore;
    use std::collections::HashSet;

    async fn rooms(store: &Arc<MemTableStore>) -> TableCollection<MemTableStore> {
        TableCollection::open(Arc::clone(store), TABLE, "rooms")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn open_creates_table() {
        let store = Arc::new(MemTableStore::new());
        let collection = rooms(&store).await;
        assert!(store.table_exists(TABLE).await.unwrap());
        assert_eq!(collection.table_name(), TABLE);
        assert_eq!(collection.partition_key(), "rooms");
    }

    #[tokio::test]
    async fn open_fails_when_table_creation_fails() {
        let store = Arc::new(MemTableStore::new());
        store.set_simulate_create_error(true);
        let result = TableCollection::open(Arc::clone(&store), TABLE, "rooms").await;
        assert!(matches!(result, Err(ButlerError::TableCreation { .. })));
    }

    #[tokio::test]
    async fn add_then_find_yields_one_more_row() {
        let fixture = StoreFixture::new().with_items(2, "rooms").await;
        let collection = rooms(&fixture.store).await;

        let before = collection.find(&TableQuery::new()).await.unwrap();
        collection
            .add_item(ItemFields::new("Kitchen", "has oven"))
            .await
            .unwrap();
        let after = collection.find(&TableQuery::new()).await.unwrap();

        assert_eq!(after.len(), before.len() + 1);
        let old_keys: HashSet<_> = before.iter().map(|i| i.row_key.clone()).collect();
        let added: Vec<_> = after
            .iter()
            .filter(|i| !old_keys.contains(&i.row_key))
            .collect();
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].name, "Kitchen");
        assert_eq!(added[0].note, "has oven");
        assert_eq!(added[0].partition_key, "rooms");
    }

    #[tokio::test]
    async fn identical_adds_get_distinct_keys() {
        let store = Arc::new(MemTableStore::new());
        let collection = rooms(&store).await;
        let fields = ItemFields::new("Hall", "");
        collection.add_item(fields.clone()).await.unwrap();
        collection.add_item(fields).await.unwrap();

        let items = collection.find(&TableQuery::new()).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_ne!(items[0].row_key, items[1].row_key);
    }

    #[tokio::test]
    async fn find_is_scoped_to_partition() {
        let fixture = StoreFixture::new().with_items(3, "types").await;
        let collection = rooms(&fixture.store).await;
        assert!(collection.find(&TableQuery::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_item_returns_requested_row() {
        let fixture = StoreFixture::new().with_items(3, "rooms").await;
        let collection = rooms(&fixture.store).await;
        for listed in collection.find(&TableQuery::new()).await.unwrap() {
            let item = collection.get_item(&listed.row_key).await.unwrap();
            assert_eq!(item.row_key, listed.row_key);
            assert_eq!(item.partition_key, "rooms");
        }
    }

    #[tokio::test]
    async fn get_item_missing_is_an_error() {
        let store = Arc::new(MemTableStore::new());
        let collection = rooms(&store).await;
        let err = collection.get_item("no-such-row").await.unwrap_err();
        assert!(matches!(err, ButlerError::RowNotFound { .. }));
    }

    #[tokio::test]
    async fn get_item_does_not_cross_partitions() {
        let fixture = StoreFixture::new().with_items(1, "types").await;
        let types = TableCollection::open(Arc::clone(&fixture.store), TABLE, "types")
            .await
            .unwrap();
        let row_key = types.find(&TableQuery::new()).await.unwrap()[0]
            .row_key
            .clone();

        let collection = rooms(&fixture.store).await;
        assert!(collection.get_item(&row_key).await.is_err());
    }

    #[tokio::test]
    async fn update_changes_fields_only() {
        let fixture = StoreFixture::new().with_items(1, "rooms").await;
        let collection = rooms(&fixture.store).await;
        let original = collection.find(&TableQuery::new()).await.unwrap().remove(0);

        collection
            .update_item(&original.row_key, ItemFields::new("Pantry", "dry goods"))
            .await
            .unwrap();

        let updated = collection.get_item(&original.row_key).await.unwrap();
        assert_eq!(updated.name, "Pantry");
        assert_eq!(updated.note, "dry goods");
        assert_eq!(updated.row_key, original.row_key);
        assert_eq!(updated.partition_key, original.partition_key);
    }

    #[tokio::test]
    async fn update_missing_row_fails_without_writing() {
        let store = Arc::new(MemTableStore::new());
        let collection = rooms(&store).await;
        let err = collection
            .update_item("no-such-row", ItemFields::new("X", "Y"))
            .await
            .unwrap_err();
        assert!(matches!(err, ButlerError::RowNotFound { .. }));
        assert_eq!(store.row_count(TABLE), 0);
    }

    #[tokio::test]
    async fn write_errors_pass_through() {
        let fixture = StoreFixture::new().with_items(1, "rooms").await;
        let collection = rooms(&fixture.store).await;
        let row_key = collection.find(&TableQuery::new()).await.unwrap()[0]
            .row_key
            .clone();
        fixture.store.set_simulate_write_error(true);

        assert!(matches!(
            collection.add_item(ItemFields::new("A", "")).await,
            Err(ButlerError::Store(_))
        ));
        assert!(matches!(
            collection.update_item(&row_key, ItemFields::new("A", "")).await,
            Err(ButlerError::Store(_))
        ));
        assert_eq!(collection.get_item(&row_key).await.unwrap().name, "Item 1");
    }

    #[tokio::test]
    async fn kitchen_scenario() {
        let store = Arc::new(MemTableStore::new());
        let collection = rooms(&store).await;
        collection
            .add_item(ItemFields::new("Kitchen", "has oven"))
            .await
            .unwrap();

        let found = collection.find(&TableQuery::new()).await.unwrap();
        assert_eq!(found.len(), 1);
        let kitchen = &found[0];
        assert_eq!(kitchen.partition_key, "rooms");
        assert_eq!(kitchen.name, "Kitchen");
        assert_eq!(kitchen.note, "has oven");
        assert!(uuid::Uuid::parse_str(&kitchen.row_key).is_ok());

        collection
            .update_item(&kitchen.row_key, ItemFields::new("Kitchen", "no oven"))
            .await
            .unwrap();
        let fetched = collection.get_item(&kitchen.row_key).await.unwrap();
        assert_eq!(fetched.note, "no oven");
        assert_eq!(fetched.name, "Kitchen");

        let by_note = collection
            .find(&TableQuery::new().where_contains(Field::Note, "no oven"))
            .await
            .unwrap();
        assert_eq!(by_note.len(), 1);
    }

    const CONCURRENT_ADDS: usize = 50;

    async fn add_concurrently<S: TableStore + 'static>(collection: &TableCollection<S>) {
        let handles: Vec<_> = (0..CONCURRENT_ADDS)
            .map(|i| {
                let collection = collection.clone();
                tokio::spawn(async move {
                    collection
                        .add_item(ItemFields::new(format!("Room {}", i), ""))
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_adds_are_all_kept_in_memory() {
        let store = Arc::new(MemTableStore::new());
        let collection = rooms(&store).await;

        add_concurrently(&collection).await;

        let items = collection.find(&TableQuery::new()).await.unwrap();
        assert_eq!(items.len(), CONCURRENT_ADDS);
        let names: HashSet<_> = items.iter().map(|i| i.name.clone()).collect();
        assert_eq!(names.len(), CONCURRENT_ADDS);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_adds_are_all_kept_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FsTableStore::new(dir.path().to_path_buf()));
        let collection = TableCollection::open(store, TABLE, "rooms").await.unwrap();

        add_concurrently(&collection).await;

        let items = collection.find(&TableQuery::new()).await.unwrap();
        assert_eq!(items.len(), CONCURRENT_ADDS);
        let keys: HashSet<_> = items.iter().map(|i| i.row_key.clone()).collect();
        assert_eq!(keys.len(), CONCURRENT_ADDS);

        let reopened = FsTableStore::new(dir.path().to_path_buf());
        let persisted = reopened
            .query_entities(TABLE, "rooms", &TableQuery::new())
            .await
            .unwrap();
        assert_eq!(persisted.len(), CONCURRENT_ADDS);
    }

    #[tokio::test]
    async fn collections_share_a_store() {
        let store = Arc::new(MemTableStore::new());
        let rooms = rooms(&store).await;
        let types = TableCollection::open(Arc::clone(&store), TABLE, "types")
            .await
            .unwrap();
        rooms.add_item(ItemFields::new("Hall", "")).await.unwrap();
        types.add_item(ItemFields::new("Lamp", "")).await.unwrap();
        assert_eq!(store.row_count(TABLE), 2);
        assert_eq!(rooms.find(&TableQuery::new()).await.unwrap()[0].name, "Hall");
        assert_eq!(types.find(&TableQuery::new()).await.unwrap()[0].name, "Lamp");
    }
}
