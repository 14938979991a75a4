//! Page type for `GET /items` results.

use serde::Deserialize;

use super::Item;
use super::ItemId;

/// A page of items returned by the collection service.
///
/// Besides the records themselves, each page carries the size of the whole
/// filtered collection and the ids the server currently considers selected.
///
/// # Example
///
/// ```
/// use shelf_lib::model::{Item, ItemPage};
///
/// let page = ItemPage::new(vec![Item::new(1, "one")], 40).with_selected(vec![1]);
/// assert_eq!(page.len(), 1);
/// assert_eq!(page.total(), 40);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemPage {
    items: Vec<Item>,
    total: usize,
    /// Missing in some service versions; treated as "nothing selected".
    #[serde(default)]
    selected: Vec<ItemId>,
}

impl ItemPage {
    /// Creates a new page with items and the collection total.
    pub fn new(items: Vec<Item>, total: usize) -> Self {
        Self {
            items,
            total,
            selected: Vec::new(),
        }
    }

    /// Sets the server-reported selected ids.
    pub fn with_selected(mut self, selected: Vec<ItemId>) -> Self {
        self.selected = selected;
        self
    }

    /// Returns a reference to the items in this page.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Returns the total number of items matching the request filter.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Returns the server-reported selected ids.
    pub fn selected(&self) -> &[ItemId] {
        &self.selected
    }

    /// Consumes the page and returns its parts.
    pub fn into_parts(self) -> (Vec<Item>, usize, Vec<ItemId>) {
        (self.items, self.total, self.selected)
    }

    /// Returns `true` if this page has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items in this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_service_payload() {
        let json = r#"{"items":[{"id":5,"value":"five"},{"id":3,"value":"three"}],"total":2,"selected":[3]}"#;
        let page: ItemPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.items()[0], Item::new(5, "five"));
        assert_eq!(page.total(), 2);
        assert_eq!(page.selected(), &[3]);
    }

    #[test]
    fn test_missing_selected_defaults_to_empty() {
        let page: ItemPage = serde_json::from_str(r#"{"items":[],"total":0}"#).unwrap();
        assert!(page.is_empty());
        assert!(page.selected().is_empty());
    }
}
