use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which of the two record collections an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionKind {
    Rooms,
    Types,
}

impl CollectionKind {
    pub fn title(&self) -> &'static str {
        match self {
            CollectionKind::Rooms => "Room List",
            CollectionKind::Types => "Type List",
        }
    }

    /// Where a client lands after a successful add or update.
    pub fn redirect(&self) -> &'static str {
        match self {
            CollectionKind::Rooms => "/rooms",
            CollectionKind::Types => "/types",
        }
    }

    pub fn singular(&self) -> &'static str {
        match self {
            CollectionKind::Rooms => "Room",
            CollectionKind::Types => "Type",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            CollectionKind::Rooms => "rooms",
            CollectionKind::Types => "types",
        }
    }
}

/// A single table row.
///
/// The store's entity encoding (`PartitionKey`, `RowKey`, `Timestamp`) only
/// shows up in the serde renames; everything else works with plain fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "PartitionKey")]
    pub partition_key: String,
    #[serde(rename = "RowKey")]
    pub row_key: String,
    pub name: String,
    pub note: String,
    /// Last write time, maintained by the store. Callers never set it.
    #[serde(
        rename = "Timestamp",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Item {
    /// Builds a fresh row in `partition_key` with a newly generated row key.
    pub fn new(partition_key: &str, fields: ItemFields) -> Self {
        Self {
            partition_key: partition_key.to_string(),
            row_key: Uuid::new_v4().to_string(),
            name: fields.name,
            note: fields.note,
            timestamp: None,
        }
    }

    pub fn apply(&mut self, fields: ItemFields) {
        self.name = fields.name;
        self.note = fields.note;
    }
}

/// The caller-supplied part of an item, used by add and update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFields {
    pub name: String,
    #[serde(default)]
    pub note: String,
}

impl ItemFields {
    pub fn new(name: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            note: note.into(),
        }
    }
}
