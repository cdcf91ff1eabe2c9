use crate::error::{ButlerError, Result};
use crate::model::CollectionKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_TABLE_NAME: &str = "butlerbod";
const DEFAULT_ROOMS_PARTITION: &str = "rooms";
const DEFAULT_TYPES_PARTITION: &str = "types";

/// Configuration for butlerbod, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ButlerConfig {
    /// Table holding both collections
    #[serde(default = "default_table_name")]
    pub table_name: String,

    #[serde(default = "default_rooms_partition")]
    pub rooms_partition: String,

    #[serde(default = "default_types_partition")]
    pub types_partition: String,
}

fn default_table_name() -> String {
    DEFAULT_TABLE_NAME.to_string()
}

fn default_rooms_partition() -> String {
    DEFAULT_ROOMS_PARTITION.to_string()
}

fn default_types_partition() -> String {
    DEFAULT_TYPES_PARTITION.to_string()
}

impl Default for ButlerConfig {
    fn default() -> Self {
        Self {
            table_name: default_table_name(),
            rooms_partition: default_rooms_partition(),
            types_partition: default_types_partition(),
        }
    }
}

impl ButlerConfig {
    /// Reads `config.json` from `data_dir`. A missing file means defaults; a
    /// present but malformed one is an error.
    pub fn load<P: AsRef<Path>>(data_dir: P) -> Result<Self> {
        match fs::read_to_string(data_dir.as_ref().join(CONFIG_FILENAME)) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ButlerError::Io(e)),
        }
    }

    /// Writes `config.json` into `data_dir`, creating the directory as needed.
    pub fn save<P: AsRef<Path>>(&self, data_dir: P) -> Result<()> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir)?;
        fs::write(
            data_dir.join(CONFIG_FILENAME),
            serde_json::to_string_pretty(self)?,
        )?;
        Ok(())
    }

    pub fn partition_for(&self, kind: CollectionKind) -> &str {
        match kind {
            CollectionKind::Rooms => &self.rooms_partition,
            CollectionKind::Types => &self.types_partition,
        }
    }
}
