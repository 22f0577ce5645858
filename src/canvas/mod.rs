//! The items that live on a behaviour canvas.
//!
//! [`CanvasItem`] is the closed set of things a workspace can hold. Adding a
//! variant forces every `match` over items to be revisited.

use crate::portal::Portal;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod behaviour;
pub mod comment;
pub mod link;

pub use behaviour::{Behaviour, BehaviourOrigin, ContainerPortal};
pub use comment::Comment;
pub use link::Link;

/// The spacing of the implicit layout grid.
pub const GRID: i32 = 10;

/// Identifies an item within one workspace.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A grid-aligned canvas position.
///
/// Only [`Position::snapped`] builds one outside the crate, so every position
/// a caller can produce lies on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub(crate) left: i32,
    pub(crate) top: i32,
}

impl Position {
    pub fn left(self) -> i32 {
        self.left
    }

    pub fn top(self) -> i32 {
        self.top
    }

    /// Snaps raw coordinates onto the grid with `x - x % 10`.
    pub fn snapped(x: i32, y: i32) -> Self {
        Self {
            left: snap(x),
            top: snap(y),
        }
    }

    pub fn is_snapped(self) -> bool {
        self.left % GRID == 0 && self.top % GRID == 0
    }

    /// The snapped position after moving by `(dx, dy)`.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::snapped(self.left.saturating_add(dx), self.top.saturating_add(dy))
    }
}

fn snap(v: i32) -> i32 {
    v - v % GRID
}

/// Everything a workspace can contain.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasItem {
    Behaviour(Behaviour),
    /// A container-level portal (an input or output of the whole graph).
    Portal(ContainerPortal),
    Link(Link),
    Comment(Comment),
}

impl CanvasItem {
    pub fn id(&self) -> ItemId {
        match self {
            CanvasItem::Behaviour(b) => b.id,
            CanvasItem::Portal(p) => p.id,
            CanvasItem::Link(l) => l.id,
            CanvasItem::Comment(c) => c.id,
        }
    }

    /// A short name for the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            CanvasItem::Behaviour(_) => "behaviour",
            CanvasItem::Portal(_) => "portal",
            CanvasItem::Link(_) => "link",
            CanvasItem::Comment(_) => "comment",
        }
    }

    /// Links have no position of their own.
    pub fn position(&self) -> Option<Position> {
        match self {
            CanvasItem::Behaviour(b) => Some(b.position),
            CanvasItem::Portal(p) => Some(p.position),
            CanvasItem::Comment(c) => Some(c.position),
            CanvasItem::Link(_) => None,
        }
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        match self {
            CanvasItem::Behaviour(b) => b.position = position,
            CanvasItem::Portal(p) => p.position = position,
            CanvasItem::Comment(c) => c.position = position,
            CanvasItem::Link(_) => {}
        }
    }

    /// The portals this item owns; empty for links and comments.
    pub fn portals(&self) -> &[Portal] {
        match self {
            CanvasItem::Behaviour(b) => b.portals(),
            CanvasItem::Portal(p) => std::slice::from_ref(&p.portal),
            CanvasItem::Link(_) | CanvasItem::Comment(_) => &[],
        }
    }

    pub(crate) fn portals_mut(&mut self) -> &mut [Portal] {
        match self {
            CanvasItem::Behaviour(b) => b.portals_mut(),
            CanvasItem::Portal(p) => std::slice::from_mut(&mut p.portal),
            CanvasItem::Link(_) | CanvasItem::Comment(_) => &mut [],
        }
    }

    pub fn portal(&self, name: &str) -> Option<&Portal> {
        self.portals().iter().find(|p| p.name() == name)
    }

    pub(crate) fn portal_mut(&mut self, name: &str) -> Option<&mut Portal> {
        self.portals_mut().iter_mut().find(|p| p.name() == name)
    }

    pub fn as_behaviour(&self) -> Option<&Behaviour> {
        match self {
            CanvasItem::Behaviour(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_link(&self) -> Option<&Link> {
        match self {
            CanvasItem::Link(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_container_portal(&self) -> Option<&ContainerPortal> {
        match self {
            CanvasItem::Portal(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_comment(&self) -> Option<&Comment> {
        match self {
            CanvasItem::Comment(c) => Some(c),
            _ => None,
        }
    }
}
