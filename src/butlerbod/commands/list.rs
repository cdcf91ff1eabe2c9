use crate::collection::TableCollection;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::CollectionKind;
use crate::query::TableQuery;
use crate::store::TableStore;

pub async fn run<S: TableStore>(
    collection: &TableCollection<S>,
    kind: CollectionKind,
    query: &TableQuery,
) -> Result<CmdResult> {
    let items = collection.find(query).await?;
    let mut result = CmdResult::default().with_title(kind.title());
    if items.is_empty() {
        result.add_message(CmdMessage::info(format!("No {} found.", kind.plural())));
    }
    Ok(result.with_listed_items(items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ButlerError;
    use crate::query::Field;
    use crate::store::memory::fixtures::{StoreFixture, TABLE};
    use crate::store::memory::MemTableStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn lists_with_title() {
        let fixture = StoreFixture::new().with_items(2, "rooms").await;
        let rooms = TableCollection::open(Arc::clone(&fixture.store), TABLE, "rooms")
            .await
            .unwrap();

        let result = run(&rooms, CollectionKind::Rooms, &TableQuery::new())
            .await
            .unwrap();
        assert_eq!(result.title.as_deref(), Some("Room List"));
        assert_eq!(result.listed_items.len(), 2);
        assert!(result.messages.is_empty());
    }

    #[tokio::test]
    async fn empty_listing_says_so() {
        let store = Arc::new(MemTableStore::new());
        let types = TableCollection::open(store, TABLE, "types").await.unwrap();

        let result = run(&types, CollectionKind::Types, &TableQuery::new())
            .await
            .unwrap();
        assert_eq!(result.title.as_deref(), Some("Type List"));
        assert!(result.listed_items.is_empty());
        assert_eq!(result.messages[0].content, "No types found.");
    }

    #[tokio::test]
    async fn applies_query() {
        let fixture = StoreFixture::new().with_items(3, "rooms").await;
        let rooms = TableCollection::open(Arc::clone(&fixture.store), TABLE, "rooms")
            .await
            .unwrap();

        let query = TableQuery::new().where_eq(Field::Name, "Item 2");
        let result = run(&rooms, CollectionKind::Rooms, &query).await.unwrap();
        assert_eq!(result.listed_items.len(), 1);
        assert_eq!(result.listed_items[0].note, "Note 2");
    }

    #[tokio::test]
    async fn store_errors_are_returned() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(crate::store::fs::FsTableStore::new(dir.path().to_path_buf()));
        let rooms = TableCollection::open(store, TABLE, "rooms").await.unwrap();
        std::fs::remove_file(dir.path().join("tables").join(format!("{}.json", TABLE))).unwrap();

        let err = run(&rooms, CollectionKind::Rooms, &TableQuery::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ButlerError::TableNotFound(_)));
    }
}
