use crate::canvas::ItemId;
use crate::portal::{PortalKind, PortalRef};

/// A link being dragged out by the user: the source is bound, the target is not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftLink {
    pub source: PortalRef,
    pub source_kind: PortalKind,
}

/// How a routing gesture ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    /// The link was created and recorded in history.
    Committed(ItemId),
    /// The draft was discarded; the item list is unchanged.
    Cancelled,
}
