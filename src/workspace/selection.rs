use crate::canvas::ItemId;
use std::collections::BTreeSet;

/// The set of currently selected items. Holds ids only, never items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    items: BTreeSet<ItemId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.items.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn clear(&mut self) -> bool {
        let changed = !self.items.is_empty();
        self.items.clear();
        changed
    }

    /// Replaces the whole set with `id`.
    pub(crate) fn select_only(&mut self, id: ItemId) -> bool {
        if self.items.len() == 1 && self.items.contains(&id) {
            return false;
        }
        self.items.clear();
        self.items.insert(id);
        true
    }

    pub(crate) fn toggle(&mut self, id: ItemId) {
        if !self.items.remove(&id) {
            self.items.insert(id);
        }
    }

    pub(crate) fn replace(&mut self, ids: impl IntoIterator<Item = ItemId>) -> bool {
        let next: BTreeSet<ItemId> = ids.into_iter().collect();
        let changed = next != self.items;
        self.items = next;
        changed
    }

    pub(crate) fn retain(&mut self, keep: impl FnMut(&ItemId) -> bool) -> bool {
        let before = self.items.len();
        self.items.retain(keep);
        before != self.items.len()
    }
}
