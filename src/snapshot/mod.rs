//! Persistence-neutral snapshots of a workspace.
//!
//! A [`WorkspaceSnapshot`] is an owned, ordered item list. Taking one never
//! locks or borrows the workspace beyond the call, so a save can run while
//! editing continues. Rebuilding a workspace from a snapshot validates every
//! invariant before anything is returned.

use crate::canvas::{
    Behaviour, BehaviourOrigin, CanvasItem, Comment, ContainerPortal, ItemId, Link, Position,
};
use crate::error::{SnapshotError, ValidationError};
use crate::portal::{Portal, PortalDefinition, PortalRef, TypeRules};
use crate::registry::{ResourceId, TemplateId};
use crate::workspace::Workspace;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub mod artifact;

pub use artifact::SnapshotArtifact;

/// The saved form of a workspace: its items in display order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkspaceSnapshot {
    pub items: Vec<SnapshotItem>,
}

/// One saved item, discriminated by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SnapshotItem {
    /// A node built from a template; `origin` holds the template id.
    Behaviour(NodeRecord),
    /// A node wrapping an asset or group; `origin` holds the resource id.
    Asset(NodeRecord),
    /// An embedded container; `origin` holds the container id.
    Instance(NodeRecord),
    /// A container portal; `portals` holds exactly one entry.
    Portal(NodeRecord),
    Link(LinkRecord),
    Comment(CommentRecord),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: ItemId,
    pub left: i32,
    pub top: i32,
    pub alias: String,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub portals: Vec<PortalDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    pub id: ItemId,
    pub source: PortalRef,
    pub target: PortalRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub id: ItemId,
    pub left: i32,
    pub top: i32,
    pub text: String,
}

impl SnapshotItem {
    pub fn id(&self) -> ItemId {
        match self {
            SnapshotItem::Behaviour(n)
            | SnapshotItem::Asset(n)
            | SnapshotItem::Instance(n)
            | SnapshotItem::Portal(n) => n.id,
            SnapshotItem::Link(l) => l.id,
            SnapshotItem::Comment(c) => c.id,
        }
    }
}

impl WorkspaceSnapshot {
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Container ids referenced by instance nodes, in item order.
    pub fn instances(&self) -> impl Iterator<Item = ResourceId> + '_ {
        self.items.iter().filter_map(|item| match item {
            SnapshotItem::Instance(node) => node.origin.clone().map(ResourceId),
            _ => None,
        })
    }

    /// The portal definitions of the container-level portal items.
    pub fn container_portals(&self) -> impl Iterator<Item = &PortalDefinition> + '_ {
        self.items.iter().filter_map(|item| match item {
            SnapshotItem::Portal(node) => node.portals.first(),
            _ => None,
        })
    }

    /// Rebuilds a live workspace, validating every structural invariant.
    pub fn into_workspace(self, rules: TypeRules) -> Result<Workspace, SnapshotError> {
        let items = self
            .items
            .into_iter()
            .map(restore_item)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Workspace::from_items(items, rules)?)
    }
}

impl Workspace {
    /// Captures the current items as an owned snapshot.
    pub fn to_snapshot(&self) -> WorkspaceSnapshot {
        WorkspaceSnapshot {
            items: self.items().iter().map(capture_item).collect(),
        }
    }

    /// Rebuilds a workspace from a snapshot using the given type rules.
    pub fn from_snapshot(
        snapshot: WorkspaceSnapshot,
        rules: TypeRules,
    ) -> Result<Workspace, SnapshotError> {
        snapshot.into_workspace(rules)
    }
}

fn capture_item(item: &CanvasItem) -> SnapshotItem {
    match item {
        CanvasItem::Behaviour(b) => {
            let origin = match &b.origin {
                BehaviourOrigin::Template(t) => t.as_str(),
                BehaviourOrigin::Asset(r) | BehaviourOrigin::Instance(r) => r.as_str(),
            };
            let record = NodeRecord {
                id: b.id,
                left: b.position.left,
                top: b.position.top,
                alias: b.alias.clone(),
                origin: Some(origin.to_string()),
                portals: b.portals().iter().map(Portal::to_definition).collect(),
            };
            match b.origin {
                BehaviourOrigin::Template(_) => SnapshotItem::Behaviour(record),
                BehaviourOrigin::Asset(_) => SnapshotItem::Asset(record),
                BehaviourOrigin::Instance(_) => SnapshotItem::Instance(record),
            }
        }
        CanvasItem::Portal(p) => SnapshotItem::Portal(NodeRecord {
            id: p.id,
            left: p.position.left,
            top: p.position.top,
            alias: p.alias.clone(),
            origin: None,
            portals: vec![p.portal.to_definition()],
        }),
        CanvasItem::Link(l) => SnapshotItem::Link(LinkRecord {
            id: l.id,
            source: l.source.clone(),
            target: l.target.clone(),
        }),
        CanvasItem::Comment(c) => SnapshotItem::Comment(CommentRecord {
            id: c.id,
            left: c.position.left,
            top: c.position.top,
            text: c.text.clone(),
        }),
    }
}

fn restore_position(id: ItemId, left: i32, top: i32) -> Position {
    let position = Position { left, top };
    if position.is_snapped() {
        position
    } else {
        let snapped = Position::snapped(left, top);
        warn!(item = %id, left, top, "snapping off-grid position from snapshot");
        snapped
    }
}

fn restore_node(
    node: NodeRecord,
    origin: impl FnOnce(String) -> BehaviourOrigin,
) -> Result<CanvasItem, ValidationError> {
    let portals = node
        .portals
        .iter()
        .map(Portal::from_definition)
        .collect::<Result<Vec<_>, _>>()?;
    let behaviour = Behaviour::new(
        node.id,
        node.alias,
        restore_position(node.id, node.left, node.top),
        origin(node.origin.unwrap_or_default()),
        portals,
    )?;
    Ok(CanvasItem::Behaviour(behaviour))
}

fn restore_item(item: SnapshotItem) -> Result<CanvasItem, ValidationError> {
    match item {
        SnapshotItem::Behaviour(node) => {
            restore_node(node, |o| BehaviourOrigin::Template(TemplateId(o)))
        }
        SnapshotItem::Asset(node) => restore_node(node, |o| BehaviourOrigin::Asset(ResourceId(o))),
        SnapshotItem::Instance(node) => {
            restore_node(node, |o| BehaviourOrigin::Instance(ResourceId(o)))
        }
        SnapshotItem::Portal(node) => {
            let [definition] = node.portals.as_slice() else {
                return Err(ValidationError::MalformedContainerPortal(node.portals.len()));
            };
            let mut portal = ContainerPortal::new(
                node.id,
                restore_position(node.id, node.left, node.top),
                Portal::from_definition(definition)?,
            );
            portal.alias = node.alias;
            Ok(CanvasItem::Portal(portal))
        }
        SnapshotItem::Link(link) => Ok(CanvasItem::Link(Link::new(
            link.id,
            link.source,
            link.target,
        ))),
        SnapshotItem::Comment(c) => Ok(CanvasItem::Comment(Comment::new(
            c.id,
            restore_position(c.id, c.left, c.top),
            c.text,
        ))),
    }
}
