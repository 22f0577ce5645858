//! The command layer: named, reversible mutations of a workspace.
//!
//! An [`Action`] is the only way an [`Editor`] changes its workspace. Each
//! action is validated against the current state, turned into a list of
//! primitive [`Edit`](crate::workspace::Edit)s, applied in one step and
//! recorded in the [`History`]. Nothing is mutated if validation fails.

use crate::canvas::ItemId;
use crate::portal::{PortalDefinition, PortalRef, PortalValue};
use crate::registry::{ResourceId, TemplateId};
use serde::{Deserialize, Serialize};
use std::fmt;

mod editor;
mod guard;
mod history;
mod planner;
mod routing;

pub use editor::{CloseDecision, Editor, EditorBuilder};
pub use guard::CycleGuard;
pub use history::History;

/// A discrete mutation requested by a view.
///
/// Creation coordinates are raw drop coordinates; they are snapped to the
/// grid when the action is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Action {
    /// Instantiate a registered template as a new behaviour.
    CreateBehaviour { template: TemplateId, x: i32, y: i32 },
    /// Create a node from a project resource: an asset, a group or a container instance.
    DropResource { resource: ResourceId, x: i32, y: i32 },
    /// Create an instance node of another container.
    CreateInstance { container: ResourceId, x: i32, y: i32 },
    /// Create a container-level portal item.
    CreatePortal {
        portal: PortalDefinition,
        x: i32,
        y: i32,
    },
    AddBehaviourPortal {
        behaviour: ItemId,
        portal: PortalDefinition,
    },
    RemoveBehaviourPortal { behaviour: ItemId, name: String },
    CreateComment { text: String, x: i32, y: i32 },
    EditComment { comment: ItemId, text: String },
    CreateLink { source: PortalRef, target: PortalRef },
    /// Rename a behaviour or a container portal item.
    Rename { item: ItemId, alias: String },
    SetPortalValue { portal: PortalRef, value: PortalValue },
    MoveItems { items: Vec<ItemId>, dx: i32, dy: i32 },
    RemoveItems { items: Vec<ItemId> },
    /// Remove every selected item.
    RemoveSelection,
}

impl Action {
    /// The event-style name under which the action is recorded.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::CreateBehaviour { .. } => "BehaviourCreated",
            Action::DropResource { .. } => "ResourceDropped",
            Action::CreateInstance { .. } => "InstanceCreated",
            Action::CreatePortal { .. } => "PortalCreated",
            Action::AddBehaviourPortal { .. } => "BehaviourPortalAdded",
            Action::RemoveBehaviourPortal { .. } => "BehaviourPortalRemoved",
            Action::CreateComment { .. } => "CommentCreated",
            Action::EditComment { .. } => "CommentEdited",
            Action::CreateLink { .. } => "LinkCreated",
            Action::Rename { .. } => "BehaviourRenamed",
            Action::SetPortalValue { .. } => "PortalValueChanged",
            Action::MoveItems { .. } => "ItemsMoved",
            Action::RemoveItems { .. } => "ItemsRemoved",
            Action::RemoveSelection => "SelectionRemoved",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind())
    }
}
