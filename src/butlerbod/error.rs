use thiserror::Error;

#[derive(Error, Debug)]
pub enum ButlerError {
    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Could not create table {table}: {reason}")]
    TableCreation { table: String, reason: String },

    #[error("Row not found: {table}/{partition_key}/{row_key}")]
    RowNotFound {
        table: String,
        partition_key: String,
        row_key: String,
    },

    #[error("Row already exists: {table}/{partition_key}/{row_key}")]
    RowExists {
        table: String,
        partition_key: String,
        row_key: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, ButlerError>;
