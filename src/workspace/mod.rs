//! The live graph store for one open container.
//!
//! A [`Workspace`] owns the ordered item list, the selection, and the link
//! currently being routed. It enforces the structural invariants:
//!
//! - item ids are unique;
//! - container portal names are unique;
//! - every link resolves both endpoints to portals of items in the list and
//!   satisfies the workspace's [`TypeRules`];
//! - every portal's back-reference list matches the links that touch it.
//!
//! Observers subscribed with [`Workspace::subscribe`] are told after every
//! committed change.

use crate::canvas::{CanvasItem, ContainerPortal, ItemId, Link};
use crate::error::{ActionError, InvariantViolation, ValidationError};
use crate::portal::{Portal, PortalRef, TypeRules};
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use std::fmt;
use tracing::debug;

mod edit;
mod observer;
mod routing;
mod selection;

pub use edit::Edit;
pub use observer::{ChangeObserver, SubscriptionId};
pub use routing::{DraftLink, RouteOutcome};
pub use selection::Selection;

use observer::Observers;

pub struct Workspace {
    items: Vec<CanvasItem>,
    selection: Selection,
    active_link: Option<DraftLink>,
    rules: TypeRules,
    observers: Observers,
    next_id: u64,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workspace")
            .field("items", &self.items)
            .field("selection", &self.selection)
            .field("active_link", &self.active_link)
            .field("rules", &self.rules)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Workspace {
    pub fn new() -> Self {
        Self::with_rules(TypeRules::default())
    }

    pub fn with_rules(rules: TypeRules) -> Self {
        Self {
            items: Vec::new(),
            selection: Selection::new(),
            active_link: None,
            rules,
            observers: Observers::default(),
            next_id: 1,
        }
    }

    /// Builds a workspace from an already ordered item list, validating every invariant.
    pub(crate) fn from_items(
        items: Vec<CanvasItem>,
        rules: TypeRules,
    ) -> Result<Self, ValidationError> {
        let mut workspace = Self::with_rules(rules);
        workspace.next_id = items.iter().map(|i| i.id().0 + 1).max().unwrap_or(1);
        workspace.items = items;
        workspace.validate_all()?;
        workspace.rebuild_back_refs();
        Ok(workspace)
    }

    // --- Queries ---

    pub fn rules(&self) -> &TypeRules {
        &self.rules
    }

    pub(crate) fn set_rules(&mut self, rules: TypeRules) {
        self.rules = rules;
    }

    /// The items in display order. The slice is read-only; all changes go
    /// through the workspace or the action layer.
    pub fn items(&self) -> &[CanvasItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn item(&self, id: ItemId) -> Option<&CanvasItem> {
        self.items.iter().find(|i| i.id() == id)
    }

    pub fn index_of(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|i| i.id() == id)
    }

    pub fn portal(&self, portal: &PortalRef) -> Option<&Portal> {
        self.item(portal.item)?.portal(&portal.portal)
    }

    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.items.iter().filter_map(CanvasItem::as_link)
    }

    pub fn container_portals(&self) -> impl Iterator<Item = &ContainerPortal> {
        self.items.iter().filter_map(CanvasItem::as_container_portal)
    }

    pub fn container_portal(&self, name: &str) -> Option<&ContainerPortal> {
        self.container_portals().find(|p| p.name() == name)
    }

    /// The id the next created item will receive.
    pub fn next_id(&self) -> ItemId {
        ItemId(self.next_id)
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn active_link(&self) -> Option<&DraftLink> {
        self.active_link.as_ref()
    }

    // --- Direct mutation ---

    /// Appends an item after validating it against the current contents,
    /// then fires `change`.
    ///
    /// Edits made here bypass the action layer and are not recorded in any
    /// undo history.
    pub fn add_item(&mut self, item: CanvasItem) -> Result<ItemId, ActionError> {
        self.validate_insert(&item)?;
        let id = item.id();
        let edit = Edit::Insert {
            index: self.items.len(),
            item,
        };
        self.apply_edits(std::slice::from_ref(&edit))?;
        self.notify();
        Ok(id)
    }

    /// Removes an item together with every link that depends on it, firing
    /// `change` once for the whole cascade.
    pub fn remove_item(&mut self, id: ItemId) -> Result<CanvasItem, ActionError> {
        let edits = self.plan_removal(&[id])?;
        self.apply_edits(&edits)?;
        self.notify();
        let removed = edits.into_iter().find_map(|edit| match edit {
            Edit::Remove { item, .. } if item.id() == id => Some(item),
            _ => None,
        });
        Ok(removed.ok_or(ValidationError::UnknownItem(id))?)
    }

    // --- Selection ---

    /// Handles a click: with `modifier` the target's membership is toggled,
    /// without it the selection becomes just the target. A click on empty
    /// space (`None`) without a modifier clears the selection.
    pub fn click(&mut self, target: Option<ItemId>, modifier: bool) {
        let changed = match (target, modifier) {
            (Some(id), _) if self.item(id).is_none() => false,
            (Some(id), true) => {
                self.selection.toggle(id);
                true
            }
            (Some(id), false) => self.selection.select_only(id),
            (None, false) => self.selection.clear(),
            (None, true) => false,
        };
        if changed {
            self.notify();
        }
    }

    /// Replaces the selection. Ids not present in the workspace are ignored.
    pub fn set_selection(&mut self, ids: impl IntoIterator<Item = ItemId>) {
        let known: Vec<ItemId> = ids.into_iter().filter(|id| self.item(*id).is_some()).collect();
        if self.selection.replace(known) {
            self.notify();
        }
    }

    pub fn clear_selection(&mut self) {
        if self.selection.clear() {
            self.notify();
        }
    }

    // --- Routing state ---

    pub(crate) fn set_active_link(&mut self, draft: Option<DraftLink>) {
        self.active_link = draft;
    }

    pub(crate) fn take_active_link(&mut self) -> Option<DraftLink> {
        self.active_link.take()
    }

    // --- Change notification ---

    /// Subscribes an observer to the `change` signal.
    pub fn subscribe(&mut self, observer: impl ChangeObserver + 'static) -> SubscriptionId {
        self.observers.add(Box::new(observer))
    }

    /// Returns `false` if the subscription was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.remove(id)
    }

    /// Fires `change` to every observer.
    pub(crate) fn notify(&mut self) {
        let mut observers = self.observers.take();
        for (_, observer) in observers.iter_mut() {
            observer.on_change(self);
        }
        self.observers.restore(observers);
    }

    // --- Validation ---

    /// Checks that `item` can be appended without breaking an invariant.
    pub fn validate_insert(&self, item: &CanvasItem) -> Result<(), ValidationError> {
        if self.item(item.id()).is_some() {
            return Err(ValidationError::DuplicateItem(item.id()));
        }
        if let Some(position) = item.position().filter(|p| !p.is_snapped()) {
            return Err(ValidationError::OffGrid {
                item: item.id(),
                left: position.left(),
                top: position.top(),
            });
        }
        match item {
            CanvasItem::Portal(portal) => {
                if self.container_portal(portal.name()).is_some() {
                    return Err(ValidationError::DuplicatePortalName(
                        portal.name().to_string(),
                    ));
                }
            }
            CanvasItem::Link(link) => {
                self.check_link(&link.source, &link.target)?;
                if self.links().any(|l| l.connects(&link.source, &link.target)) {
                    return Err(ValidationError::DuplicateLink {
                        from: link.source.clone(),
                        to: link.target.clone(),
                    });
                }
            }
            CanvasItem::Behaviour(_) | CanvasItem::Comment(_) => {}
        }
        Ok(())
    }

    /// Resolves both endpoints and applies the type rules.
    pub fn check_link(&self, source: &PortalRef, target: &PortalRef) -> Result<(), ValidationError> {
        let from = self
            .portal(source)
            .ok_or_else(|| ValidationError::UnknownPortal(source.clone()))?;
        let to = self
            .portal(target)
            .ok_or_else(|| ValidationError::UnknownPortal(target.clone()))?;
        self.rules.check_link(source, from, target, to)
    }

    /// Validates the whole item list at once. Used when rebuilding from a snapshot,
    /// where links may precede the items they reference.
    fn validate_all(&self) -> Result<(), ValidationError> {
        if let Some(id) = self.items.iter().map(CanvasItem::id).duplicates().next() {
            return Err(ValidationError::DuplicateItem(id));
        }
        if let Some(name) = self.container_portals().map(|p| p.name()).duplicates().next() {
            return Err(ValidationError::DuplicatePortalName(name.to_string()));
        }
        for link in self.links() {
            self.check_link(&link.source, &link.target)?;
        }
        if let Some(link) = self
            .links()
            .duplicates_by(|l| (&l.source, &l.target))
            .next()
        {
            return Err(ValidationError::DuplicateLink {
                from: link.source.clone(),
                to: link.target.clone(),
            });
        }
        Ok(())
    }

    /// Full consistency check, including portal back-references.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if let Some(id) = self.items.iter().map(CanvasItem::id).duplicates().next() {
            return Err(InvariantViolation::DuplicateId(id));
        }
        if let Some(name) = self.container_portals().map(|p| p.name()).duplicates().next() {
            return Err(InvariantViolation::DuplicatePortalName(name.to_string()));
        }
        if let Some(item) = self
            .items
            .iter()
            .find(|i| i.position().is_some_and(|p| !p.is_snapped()))
        {
            return Err(InvariantViolation::OffGrid(item.id()));
        }
        for link in self.links() {
            for end in [&link.source, &link.target] {
                if self.portal(end).is_none() {
                    return Err(InvariantViolation::DanglingLink {
                        link: link.id,
                        portal: end.clone(),
                    });
                }
            }
        }
        let expected = self.collect_back_refs();
        for item in &self.items {
            for portal in item.portals() {
                let key = PortalRef::new(item.id(), portal.name());
                let links = expected.get(&key).map(Vec::as_slice).unwrap_or(&[]);
                if portal.links() != links {
                    return Err(InvariantViolation::StaleBackReference { portal: key });
                }
            }
        }
        Ok(())
    }

    // --- Edit application ---

    /// Plans the removal of `ids` and every link depending on them.
    ///
    /// The returned edits remove items in descending index order, so each
    /// recorded index is valid at the moment it is applied.
    pub fn plan_removal(&self, ids: &[ItemId]) -> Result<Vec<Edit>, ValidationError> {
        let mut doomed: AHashSet<ItemId> = AHashSet::new();
        for &id in ids {
            if self.item(id).is_none() {
                return Err(ValidationError::UnknownItem(id));
            }
            doomed.insert(id);
        }
        let cascade: Vec<ItemId> = self
            .links()
            .filter(|l| doomed.contains(&l.source.item) || doomed.contains(&l.target.item))
            .map(|l| l.id)
            .collect();
        doomed.extend(cascade);

        Ok(self
            .items
            .iter()
            .enumerate()
            .filter(|(_, item)| doomed.contains(&item.id()))
            .rev()
            .map(|(index, item)| Edit::Remove {
                index,
                item: item.clone(),
            })
            .collect())
    }

    /// Applies a pre-validated edit sequence without notifying observers.
    ///
    /// Back-references are rebuilt, removed items leave the selection, and a
    /// routing draft whose source vanished is dropped.
    pub(crate) fn apply_edits(&mut self, edits: &[Edit]) -> Result<(), InvariantViolation> {
        for edit in edits {
            self.apply_edit(edit)?;
        }
        self.rebuild_back_refs();

        let live: AHashSet<ItemId> = self.items.iter().map(CanvasItem::id).collect();
        self.selection.retain(|id| live.contains(id));
        if let Some(draft) = &self.active_link {
            if self.portal(&draft.source).is_none() {
                debug!(source = %draft.source, "routing source removed, dropping draft");
                self.active_link = None;
            }
        }

        #[cfg(debug_assertions)]
        if let Err(violation) = self.check_invariants() {
            tracing::error!(%violation, "edit sequence left the workspace inconsistent");
            return Err(violation);
        }
        Ok(())
    }

    fn apply_edit(&mut self, edit: &Edit) -> Result<(), InvariantViolation> {
        match edit {
            Edit::Insert { index, item } => {
                if *index > self.items.len() {
                    return Err(InvariantViolation::EditMismatch {
                        index: *index,
                        expected: item.id(),
                        found: None,
                    });
                }
                self.next_id = self.next_id.max(item.id().0 + 1);
                self.items.insert(*index, item.clone());
            }
            Edit::Remove { index, item } => {
                self.expect_at(*index, item.id())?;
                self.items.remove(*index);
            }
            Edit::Replace { index, before, after } => {
                self.expect_at(*index, before.id())?;
                self.items[*index] = after.clone();
            }
        }
        Ok(())
    }

    fn expect_at(&self, index: usize, expected: ItemId) -> Result<(), InvariantViolation> {
        let found = self.items.get(index).map(CanvasItem::id);
        if found == Some(expected) {
            Ok(())
        } else {
            Err(InvariantViolation::EditMismatch {
                index,
                expected,
                found,
            })
        }
    }

    fn collect_back_refs(&self) -> AHashMap<PortalRef, Vec<ItemId>> {
        let mut refs: AHashMap<PortalRef, Vec<ItemId>> = AHashMap::new();
        for link in self.links() {
            refs.entry(link.source.clone()).or_default().push(link.id);
            refs.entry(link.target.clone()).or_default().push(link.id);
        }
        for links in refs.values_mut() {
            links.sort();
        }
        refs
    }

    fn rebuild_back_refs(&mut self) {
        let mut refs = self.collect_back_refs();
        for item in &mut self.items {
            let owner = item.id();
            for portal in item.portals_mut() {
                let key = PortalRef::new(owner, portal.name());
                portal.set_links(refs.remove(&key).unwrap_or_default());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{Comment, Position};

    fn off_grid_comment(id: u64) -> CanvasItem {
        CanvasItem::Comment(Comment::new(ItemId(id), Position { left: 3, top: 7 }, "note"))
    }

    #[test]
    fn off_grid_items_are_rejected() {
        let mut workspace = Workspace::new();
        let result = workspace.add_item(off_grid_comment(1));
        assert!(matches!(
            result,
            Err(ActionError::Validation(ValidationError::OffGrid {
                left: 3,
                top: 7,
                ..
            }))
        ));
        assert!(workspace.is_empty());
    }

    #[test]
    fn invariants_flag_off_grid_items() {
        let mut workspace = Workspace::new();
        workspace.items.push(off_grid_comment(1));
        assert_eq!(
            workspace.check_invariants(),
            Err(InvariantViolation::OffGrid(ItemId(1)))
        );
    }
}
