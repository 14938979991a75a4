//! Selection state.
//!
//! Membership is keyed by item id so it stays stable while items are appended,
//! reordered or filtered out by a search.

use std::collections::HashMap;
use std::collections::HashSet;

use crate::model::ItemId;

/// Id-based selection state.
///
/// Every membership change gets a revision number. A confirmation that fails
/// later can only be rolled back if the id has not changed again since.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    /// Currently selected ids
    selected: HashSet<ItemId>,
    /// Revision of the last change per id
    revisions: HashMap<ItemId, u64>,
    next_revision: u64,
}

impl Selection {
    /// Create a new empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a selection holding `ids`.
    pub fn from_ids(ids: impl IntoIterator<Item = ItemId>) -> Self {
        Self {
            selected: ids.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Get all selected ids (sorted for deterministic ordering).
    pub fn selected(&self) -> Vec<ItemId> {
        let mut ids: Vec<_> = self.selected.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Check if an id is selected.
    pub fn is_selected(&self, id: ItemId) -> bool {
        self.selected.contains(&id)
    }

    /// Get the number of selected items.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Check if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Set membership of `id`.
    ///
    /// Returns the revision of the change, or `None` if membership already
    /// matched.
    pub fn set(&mut self, id: ItemId, selected: bool) -> Option<u64> {
        let changed = if selected {
            self.selected.insert(id)
        } else {
            self.selected.remove(&id)
        };
        if !changed {
            return None;
        }
        self.next_revision += 1;
        self.revisions.insert(id, self.next_revision);
        Some(self.next_revision)
    }

    /// Revision of the last change to `id`, if it changed since the last replace.
    pub fn revision(&self, id: ItemId) -> Option<u64> {
        self.revisions.get(&id).copied()
    }

    /// Undo the change made at `revision` for `id`.
    ///
    /// No-op if `id` has been changed again (or the selection replaced) since.
    pub fn rollback(&mut self, id: ItemId, requested: bool, revision: u64) -> bool {
        if self.revision(id) != Some(revision) {
            return false;
        }
        if requested {
            self.selected.remove(&id);
        } else {
            self.selected.insert(id);
        }
        self.revisions.remove(&id);
        true
    }

    /// Replace the whole selection.
    /// Pending revisions are forgotten.
    pub fn replace(&mut self, ids: impl IntoIterator<Item = ItemId>) {
        self.selected = ids.into_iter().collect();
        self.revisions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_is_idempotent() {
        let mut selection = Selection::new();
        assert!(selection.set(7, true).is_some());
        assert_eq!(selection.set(7, true), None);
        assert_eq!(selection.selected(), vec![7]);
        assert_eq!(selection.set(8, false), None);
    }

    #[test]
    fn test_last_write_wins() {
        let mut selection = Selection::new();
        let calls = [(1, true), (2, true), (1, false), (2, false), (2, true), (1, true), (1, false)];
        for (id, selected) in calls {
            selection.set(id, selected);
        }
        assert!(!selection.is_selected(1));
        assert!(selection.is_selected(2));
    }

    #[test]
    fn test_rollback_only_latest_revision() {
        let mut selection = Selection::new();
        let first = selection.set(3, true).unwrap();
        let second = selection.set(3, false).unwrap();

        assert!(!selection.rollback(3, true, first));
        assert!(!selection.is_selected(3));

        assert!(selection.rollback(3, false, second));
        assert!(selection.is_selected(3));
        assert!(!selection.rollback(3, false, second));
    }

    #[test]
    fn test_replace_forgets_revisions() {
        let mut selection = Selection::from_ids([1, 2]);
        let rev = selection.set(3, true).unwrap();
        selection.replace([4]);
        assert!(!selection.rollback(3, true, rev));
        assert_eq!(selection.selected(), vec![4]);
    }
}
