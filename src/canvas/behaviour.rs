use super::{ItemId, Position};
use crate::error::ValidationError;
use crate::portal::{Portal, PortalKind};
use crate::registry::{ResourceId, TemplateId};

/// What a behaviour node was built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BehaviourOrigin {
    /// A registered node template.
    Template(TemplateId),
    /// A project asset or asset group dropped onto the canvas.
    Asset(ResourceId),
    /// An embedded instance of another container.
    Instance(ResourceId),
}

/// A node on the canvas owning typed portals.
#[derive(Debug, Clone, PartialEq)]
pub struct Behaviour {
    pub id: ItemId,
    pub alias: String,
    pub position: Position,
    pub origin: BehaviourOrigin,
    portals: Vec<Portal>,
}

impl Behaviour {
    /// Creates a behaviour, rejecting duplicate portal names.
    pub fn new(
        id: ItemId,
        alias: impl Into<String>,
        position: Position,
        origin: BehaviourOrigin,
        portals: Vec<Portal>,
    ) -> Result<Self, ValidationError> {
        let mut behaviour = Self {
            id,
            alias: alias.into(),
            position,
            origin,
            portals: Vec::with_capacity(portals.len()),
        };
        for portal in portals {
            behaviour.add_portal(portal)?;
        }
        Ok(behaviour)
    }

    pub fn portals(&self) -> &[Portal] {
        &self.portals
    }

    pub(crate) fn portals_mut(&mut self) -> &mut [Portal] {
        &mut self.portals
    }

    pub fn portal(&self, name: &str) -> Option<&Portal> {
        self.portals.iter().find(|p| p.name() == name)
    }

    fn of_kind(&self, kind: PortalKind) -> impl Iterator<Item = &Portal> {
        self.portals.iter().filter(move |p| p.kind() == kind)
    }

    pub fn inputs(&self) -> impl Iterator<Item = &Portal> {
        self.of_kind(PortalKind::Input)
    }

    pub fn outputs(&self) -> impl Iterator<Item = &Portal> {
        self.of_kind(PortalKind::Output)
    }

    pub fn parameters(&self) -> impl Iterator<Item = &Portal> {
        self.of_kind(PortalKind::Parameter)
    }

    pub fn products(&self) -> impl Iterator<Item = &Portal> {
        self.of_kind(PortalKind::Product)
    }

    /// Appends a portal; names must be unique within the behaviour.
    pub fn add_portal(&mut self, portal: Portal) -> Result<(), ValidationError> {
        if self.portal(portal.name()).is_some() {
            return Err(ValidationError::DuplicateBehaviourPortal {
                item: self.id,
                name: portal.name().to_string(),
            });
        }
        self.portals.push(portal);
        Ok(())
    }

    pub fn remove_portal(&mut self, name: &str) -> Option<Portal> {
        let index = self.portals.iter().position(|p| p.name() == name)?;
        Some(self.portals.remove(index))
    }

    /// `true` when this node embeds another container.
    pub fn is_instance(&self) -> bool {
        matches!(self.origin, BehaviourOrigin::Instance(_))
    }
}

/// A portal of the container itself, drawn as a standalone canvas item.
///
/// Its name must be unique among all container portals of a workspace.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerPortal {
    pub id: ItemId,
    pub alias: String,
    pub position: Position,
    pub portal: Portal,
}

impl ContainerPortal {
    pub fn new(id: ItemId, position: Position, portal: Portal) -> Self {
        Self {
            id,
            alias: portal.name().to_string(),
            position,
            portal,
        }
    }

    pub fn name(&self) -> &str {
        self.portal.name()
    }
}
