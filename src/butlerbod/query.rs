//! Filter criteria for
//! [`TableStore::query_entities`](crate::store::TableStore::query_entities).
//!
//! A [`TableQuery`] is a list of AND-ed conditions over the row fields. The
//! empty query matches every row of a partition. There is no projection and no
//! `top(n)`: results are always the full match set.

use crate::error::{ButlerError, Result};
use crate::model::Item;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    RowKey,
    Name,
    Note,
}

impl Field {
    fn value<'a>(&self, item: &'a Item) -> &'a str {
        match self {
            Field::RowKey => &item.row_key,
            Field::Name => &item.name,
            Field::Note => &item.note,
        }
    }
}

impl FromStr for Field {
    type Err = ButlerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "RowKey" | "row_key" | "rowKey" => Ok(Field::RowKey),
            "name" => Ok(Field::Name),
            "note" => Ok(Field::Note),
            other => Err(ButlerError::InvalidQuery(format!(
                "Unknown field: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Eq(Field, String),
    /// Case-insensitive substring match.
    Contains(Field, String),
}

impl Condition {
    fn matches(&self, item: &Item) -> bool {
        match self {
            Condition::Eq(field, value) => field.value(item) == value,
            Condition::Contains(field, value) => field
                .value(item)
                .to_lowercase()
                .contains(&value.to_lowercase()),
        }
    }
}

/// Parses `field=value` (exact) or `field~value` (contains), whichever
/// operator comes first.
impl FromStr for Condition {
    type Err = ButlerError;

    fn from_str(s: &str) -> Result<Self> {
        let (pos, op) = s
            .char_indices()
            .find(|(_, c)| *c == '=' || *c == '~')
            .ok_or_else(|| {
                ButlerError::InvalidQuery(format!("Expected field=value or field~value: {}", s))
            })?;
        let field: Field = s[..pos].trim().parse()?;
        let value = s[pos + 1..].to_string();
        Ok(match op {
            '=' => Condition::Eq(field, value),
            _ => Condition::Contains(field, value),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableQuery {
    conditions: Vec<Condition>,
}

impl TableQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_eq(mut self, field: Field, value: impl Into<String>) -> Self {
        self.conditions.push(Condition::Eq(field, value.into()));
        self
    }

    pub fn where_contains(mut self, field: Field, value: impl Into<String>) -> Self {
        self.conditions.push(Condition::Contains(field, value.into()));
        self
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn matches(&self, item: &Item) -> bool {
        self.conditions.iter().all(|c| c.matches(item))
    }
}
