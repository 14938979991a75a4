//! Display order of the loaded items.

use std::collections::HashMap;
use std::collections::HashSet;

use crate::model::Item;
use crate::model::ItemId;

/// The user-visible sequence of items.
///
/// Ids are unique: inserting an id that is already present is skipped.
#[derive(Debug, Clone, Default)]
pub struct Order {
    items: Vec<Item>,
    ids: HashSet<ItemId>,
}

impl Order {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an order from `items`, keeping the first occurrence of each id.
    pub fn from_items(items: Vec<Item>) -> Self {
        let mut order = Self::new();
        order.append(items);
        order
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id).collect()
    }

    /// Replaces the whole sequence.
    pub fn replace(&mut self, items: Vec<Item>) {
        *self = Self::from_items(items);
    }

    /// Appends `items` after the current ones. Returns how many were new.
    pub fn append(&mut self, items: Vec<Item>) -> usize {
        let before = self.items.len();
        for item in items {
            if self.ids.insert(item.id) {
                self.items.push(item);
            } else {
                log::debug!("skipping duplicate item {}", item.id);
            }
        }
        self.items.len() - before
    }

    /// Moves the item at `source` so it ends up at `destination`.
    ///
    /// The destination is clamped to the last index. Returns the final index of
    /// the moved item, or `None` if `source` is out of range or nothing moved.
    pub fn move_item(&mut self, source: usize, destination: usize) -> Option<usize> {
        if source >= self.items.len() {
            return None;
        }
        let destination = destination.min(self.items.len() - 1);
        if source == destination {
            return None;
        }
        let item = self.items.remove(source);
        self.items.insert(destination, item);
        Some(destination)
    }

    /// Rearranges the items to follow `ids`.
    ///
    /// Only applies when `ids` is a permutation of the current ids.
    pub fn arrange(&mut self, ids: &[ItemId]) -> bool {
        let requested: HashSet<ItemId> = ids.iter().copied().collect();
        if requested.len() != ids.len() || requested != self.ids {
            return false;
        }
        let items = arrange_by(ids, std::mem::take(&mut self.items));
        self.items = items;
        true
    }
}

/// Orders `items` by their position in `ids`, dropping items not listed there.
pub(crate) fn arrange_by(ids: &[ItemId], items: Vec<Item>) -> Vec<Item> {
    let mut by_id: HashMap<ItemId, Item> = items.into_iter().map(|item| (item.id, item)).collect();
    ids.iter().filter_map(|id| by_id.remove(id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(ids: &[ItemId]) -> Order {
        Order::from_items(ids.iter().map(|&id| Item::new(id, format!("item {id}"))).collect())
    }

    #[test]
    fn test_move_forward_and_back() {
        let mut o = order(&[1, 2, 3, 4, 5]);
        assert_eq!(o.move_item(0, 3), Some(3));
        assert_eq!(o.ids(), vec![2, 3, 4, 1, 5]);
        assert_eq!(o.move_item(4, 0), Some(0));
        assert_eq!(o.ids(), vec![5, 2, 3, 4, 1]);
    }

    #[test]
    fn test_move_destination_is_clamped() {
        let mut o = order(&[1, 2, 3]);
        assert_eq!(o.move_item(0, 99), Some(2));
        assert_eq!(o.ids(), vec![2, 3, 1]);
    }

    #[test]
    fn test_move_noops() {
        let mut o = order(&[1, 2, 3]);
        assert_eq!(o.move_item(5, 0), None);
        assert_eq!(o.move_item(1, 1), None);
        assert_eq!(o.ids(), vec![1, 2, 3]);
        assert_eq!(Order::new().move_item(0, 0), None);
    }

    #[test]
    fn test_every_move_is_a_permutation() {
        let ids: Vec<ItemId> = (1..=6).collect();
        for source in 0..ids.len() {
            for destination in 0..ids.len() + 2 {
                let mut o = order(&ids);
                let moved = o.get(source).map(|item| item.id);
                o.move_item(source, destination);
                let mut sorted = o.ids();
                sorted.sort();
                assert_eq!(sorted, ids);
                let clamped = destination.min(ids.len() - 1);
                assert_eq!(o.get(clamped).map(|item| item.id), moved);
            }
        }
    }

    #[test]
    fn test_append_skips_duplicates() {
        let mut o = order(&[1, 2]);
        let added = o.append(vec![Item::new(2, "again"), Item::new(3, "three")]);
        assert_eq!(added, 1);
        assert_eq!(o.ids(), vec![1, 2, 3]);
        assert_eq!(o.get(1).unwrap().value, "item 2");
    }

    #[test]
    fn test_arrange() {
        let mut o = order(&[1, 2, 3]);
        assert!(o.arrange(&[3, 1, 2]));
        assert_eq!(o.ids(), vec![3, 1, 2]);
        assert!(!o.arrange(&[3, 1]));
        assert!(!o.arrange(&[3, 1, 7]));
        assert_eq!(o.ids(), vec![3, 1, 2]);
    }

    #[test]
    fn test_arrange_by_drops_unlisted() {
        let items = vec![Item::new(9, "nine"), Item::new(5, "five"), Item::new(4, "four")];
        let arranged = arrange_by(&[5, 3, 9], items);
        let ids: Vec<ItemId> = arranged.iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![5, 9]);
    }
}
