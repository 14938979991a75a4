//! Collection item.

use serde::Deserialize;
use serde::Serialize;

/// Stable identifier of an item in the remote collection.
pub type ItemId = i64;

/// A single addressable record with a stable id and a display value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub value: String,
}

impl Item {
    /// Creates a new item.
    pub fn new(id: ItemId, value: impl Into<String>) -> Self {
        Self {
            id,
            value: value.into(),
        }
    }
}
