//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for every butlerbod operation, whatever client sits on top
//! (the `butler` CLI today, an HTTP front end tomorrow).
//!
//! The facade:
//! - **Owns** one [`TableCollection`] per [`CollectionKind`]
//! - **Dispatches** to the matching command function
//! - **Checks caller input** (a name must not be blank) before any store call
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! It does no I/O of its own and holds no state besides the collections.
//!
//! ## Generic Over TableStore
//!
//! `ButlerApi<S: TableStore>` works with any store binding:
//! - CLI: `ButlerApi<FsTableStore>`
//! - Tests: `ButlerApi<MemTableStore>`

use crate::collection::TableCollection;
use crate::commands;
use crate::config::ButlerConfig;
use crate::error::{ButlerError, Result};
use crate::model::{CollectionKind, ItemFields};
use crate::query::TableQuery;
use crate::store::TableStore;
use std::sync::Arc;

/// The main API facade for butlerbod operations.
pub struct ButlerApi<S: TableStore> {
    rooms: TableCollection<S>,
    types: TableCollection<S>,
}

impl<S: TableStore> ButlerApi<S> {
    /// Opens both collections on `store`. Fails if their table cannot be
    /// created.
    pub async fn open(store: Arc<S>, config: &ButlerConfig) -> Result<Self> {
        let rooms = TableCollection::open(
            Arc::clone(&store),
            config.table_name.as_str(),
            config.partition_for(CollectionKind::Rooms),
        )
        .await?;
        let types = TableCollection::open(
            store,
            config.table_name.as_str(),
            config.partition_for(CollectionKind::Types),
        )
        .await?;
        Ok(Self { rooms, types })
    }

    pub fn collection(&self, kind: CollectionKind) -> &TableCollection<S> {
        match kind {
            CollectionKind::Rooms => &self.rooms,
            CollectionKind::Types => &self.types,
        }
    }

    pub async fn list(
        &self,
        kind: CollectionKind,
        query: &TableQuery,
    ) -> Result<commands::CmdResult> {
        commands::list::run(self.collection(kind), kind, query).await
    }

    pub async fn add(
        &self,
        kind: CollectionKind,
        name: String,
        note: String,
    ) -> Result<commands::CmdResult> {
        let fields = item_fields(name, note)?;
        commands::add::run(self.collection(kind), kind, fields).await
    }

    pub async fn get(&self, kind: CollectionKind, row_key: &str) -> Result<commands::CmdResult> {
        commands::get::run(self.collection(kind), kind, row_key).await
    }

    pub async fn update(
        &self,
        kind: CollectionKind,
        row_key: &str,
        name: String,
        note: String,
    ) -> Result<commands::CmdResult> {
        let fields = item_fields(name, note)?;
        commands::update::run(self.collection(kind), kind, row_key, fields).await
    }
}

fn item_fields(name: String, note: String) -> Result<ItemFields> {
    if name.trim().is_empty() {
        return Err(ButlerError::Api("Name cannot be empty".into()));
    }
    Ok(ItemFields::new(name, note))
}

pub use commands::{CmdMessage, CmdResult, MessageLevel};
