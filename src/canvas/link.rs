use super::ItemId;
use crate::portal::PortalRef;

/// A directed edge from a source portal to a target portal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: ItemId,
    pub source: PortalRef,
    pub target: PortalRef,
}

impl Link {
    pub fn new(id: ItemId, source: PortalRef, target: PortalRef) -> Self {
        Self { id, source, target }
    }

    /// `true` if either endpoint belongs to `item`.
    pub fn touches_item(&self, item: ItemId) -> bool {
        self.source.item == item || self.target.item == item
    }

    /// `true` if either endpoint is `portal`.
    pub fn touches(&self, portal: &PortalRef) -> bool {
        &self.source == portal || &self.target == portal
    }

    pub fn connects(&self, source: &PortalRef, target: &PortalRef) -> bool {
        &self.source == source && &self.target == target
    }
}
