use super::Action;
use super::guard::CycleGuard;
use crate::canvas::{
    Behaviour, BehaviourOrigin, CanvasItem, Comment, ContainerPortal, ItemId, Link, Position,
};
use crate::error::{ActionError, ReferenceError, ValidationError};
use crate::portal::{
    DataType, Portal, PortalDefinition, PortalKind, PortalRef, PortalValue,
};
use crate::registry::{ProjectResource, ResourceId, ResourceLookup, TemplateId, TemplateRegistry};
use crate::workspace::{Edit, Workspace};
use itertools::Itertools;

/// The validated outcome of an action, ready to apply.
pub(super) struct Plan {
    pub(super) edits: Vec<Edit>,
    /// The item the action created or primarily touched.
    pub(super) primary: Option<ItemId>,
}

impl Plan {
    fn single(edit: Edit, primary: ItemId) -> Self {
        Self {
            edits: vec![edit],
            primary: Some(primary),
        }
    }

    fn empty() -> Self {
        Self {
            edits: Vec::new(),
            primary: None,
        }
    }
}

/// Turns actions into edit sequences without touching the workspace.
///
/// All validation happens here, against the current state, so a rejected
/// action never leaves a partial mutation behind.
pub(super) struct Planner<'a> {
    workspace: &'a Workspace,
    templates: &'a dyn TemplateRegistry,
    resources: &'a dyn ResourceLookup,
    container: Option<&'a ResourceId>,
}

impl<'a> Planner<'a> {
    pub(super) fn new(
        workspace: &'a Workspace,
        templates: &'a dyn TemplateRegistry,
        resources: &'a dyn ResourceLookup,
        container: Option<&'a ResourceId>,
    ) -> Self {
        Self {
            workspace,
            templates,
            resources,
            container,
        }
    }

    pub(super) fn plan(&self, action: &Action) -> Result<Plan, ActionError> {
        match action {
            Action::CreateBehaviour { template, x, y } => self.create_behaviour(template, *x, *y),
            Action::DropResource { resource, x, y } => self.drop_resource(resource, *x, *y),
            Action::CreateInstance { container, x, y } => self.create_instance(container, *x, *y),
            Action::CreatePortal { portal, x, y } => self.create_portal(portal, *x, *y),
            Action::AddBehaviourPortal { behaviour, portal } => {
                self.add_behaviour_portal(*behaviour, portal)
            }
            Action::RemoveBehaviourPortal { behaviour, name } => {
                self.remove_behaviour_portal(*behaviour, name)
            }
            Action::CreateComment { text, x, y } => Ok(self.create_comment(text, *x, *y)),
            Action::EditComment { comment, text } => self.edit_comment(*comment, text),
            Action::CreateLink { source, target } => self.create_link(source, target),
            Action::Rename { item, alias } => self.rename(*item, alias),
            Action::SetPortalValue { portal, value } => self.set_portal_value(portal, value),
            Action::MoveItems { items, dx, dy } => self.move_items(items, *dx, *dy),
            Action::RemoveItems { items } => self.remove_items(items),
            Action::RemoveSelection => {
                let selected: Vec<ItemId> = self.workspace.selection().iter().collect();
                self.remove_items(&selected)
            }
        }
    }

    fn append(&self, item: CanvasItem) -> Result<Plan, ActionError> {
        self.workspace.validate_insert(&item)?;
        let id = item.id();
        let edit = Edit::Insert {
            index: self.workspace.len(),
            item,
        };
        Ok(Plan::single(edit, id))
    }

    fn build_portals(definitions: &[PortalDefinition]) -> Result<Vec<Portal>, ValidationError> {
        definitions.iter().map(Portal::from_definition).collect()
    }

    // --- Creation ---

    fn create_behaviour(&self, template: &TemplateId, x: i32, y: i32) -> Result<Plan, ActionError> {
        let definition = self
            .templates
            .template(template)
            .ok_or_else(|| ReferenceError::UnknownTemplate(template.to_string()))?;
        let behaviour = Behaviour::new(
            self.workspace.next_id(),
            definition.name.clone(),
            Position::snapped(x, y),
            BehaviourOrigin::Template(template.clone()),
            Self::build_portals(&definition.portals)?,
        )?;
        self.append(CanvasItem::Behaviour(behaviour))
    }

    fn drop_resource(&self, resource: &ResourceId, x: i32, y: i32) -> Result<Plan, ActionError> {
        let found = self
            .resources
            .resource(resource)
            .ok_or_else(|| ReferenceError::UnknownResource(resource.to_string()))?;

        let (product, data_type) = match found {
            ProjectResource::Container(_) => return self.create_instance(resource, x, y),
            ProjectResource::Asset(_) => ("Asset", DataType::Asset),
            ProjectResource::Group(_) => ("Group", DataType::Group),
        };
        let portal = PortalDefinition::new(product, PortalKind::Product, data_type)
            .with_value(PortalValue::Reference(resource.to_string()));
        let behaviour = Behaviour::new(
            self.workspace.next_id(),
            found.name(),
            Position::snapped(x, y),
            BehaviourOrigin::Asset(resource.clone()),
            vec![Portal::from_definition(&portal)?],
        )?;
        self.append(CanvasItem::Behaviour(behaviour))
    }

    /// The single entry point for instance nodes; the cycle guard always runs here.
    fn create_instance(&self, container: &ResourceId, x: i32, y: i32) -> Result<Plan, ActionError> {
        let target = self
            .resources
            .container(container)
            .ok_or_else(|| ReferenceError::UnknownContainer(container.to_string()))?;
        CycleGuard::new(self.resources).check(self.container, target)?;

        let definitions: Vec<PortalDefinition> =
            target.snapshot.container_portals().cloned().collect();
        let behaviour = Behaviour::new(
            self.workspace.next_id(),
            target.name.clone(),
            Position::snapped(x, y),
            BehaviourOrigin::Instance(container.clone()),
            Self::build_portals(&definitions)?,
        )?;
        self.append(CanvasItem::Behaviour(behaviour))
    }

    fn create_portal(&self, definition: &PortalDefinition, x: i32, y: i32) -> Result<Plan, ActionError> {
        if self.workspace.container_portal(&definition.name).is_some() {
            return Err(ValidationError::DuplicatePortalName(definition.name.clone()).into());
        }
        let portal = ContainerPortal::new(
            self.workspace.next_id(),
            Position::snapped(x, y),
            Portal::from_definition(definition)?,
        );
        self.append(CanvasItem::Portal(portal))
    }

    fn create_comment(&self, text: &str, x: i32, y: i32) -> Plan {
        let id = self.workspace.next_id();
        let comment = Comment::new(id, Position::snapped(x, y), text);
        let edit = Edit::Insert {
            index: self.workspace.len(),
            item: CanvasItem::Comment(comment),
        };
        Plan::single(edit, id)
    }

    fn create_link(&self, source: &PortalRef, target: &PortalRef) -> Result<Plan, ActionError> {
        let link = Link::new(self.workspace.next_id(), source.clone(), target.clone());
        self.append(CanvasItem::Link(link))
    }

    // --- Updates ---

    fn locate(&self, id: ItemId) -> Result<(usize, &'a CanvasItem), ValidationError> {
        let index = self
            .workspace
            .index_of(id)
            .ok_or(ValidationError::UnknownItem(id))?;
        Ok((index, &self.workspace.items()[index]))
    }

    fn locate_behaviour(&self, id: ItemId) -> Result<(usize, &'a Behaviour), ValidationError> {
        let (index, item) = self.locate(id)?;
        match item {
            CanvasItem::Behaviour(b) => Ok((index, b)),
            other => Err(ValidationError::WrongItemKind {
                item: id,
                expected: "behaviour",
                found: other.kind_name(),
            }),
        }
    }

    fn replace(index: usize, before: &CanvasItem, after: CanvasItem) -> Plan {
        let id = before.id();
        if before == &after {
            return Plan {
                edits: Vec::new(),
                primary: Some(id),
            };
        }
        Plan::single(
            Edit::Replace {
                index,
                before: before.clone(),
                after,
            },
            id,
        )
    }

    fn add_behaviour_portal(
        &self,
        behaviour: ItemId,
        definition: &PortalDefinition,
    ) -> Result<Plan, ActionError> {
        let (index, current) = self.locate_behaviour(behaviour)?;
        let mut updated = current.clone();
        updated.add_portal(Portal::from_definition(definition)?)?;
        Ok(Self::replace(
            index,
            &self.workspace.items()[index],
            CanvasItem::Behaviour(updated),
        ))
    }

    fn remove_behaviour_portal(&self, behaviour: ItemId, name: &str) -> Result<Plan, ActionError> {
        let (index, current) = self.locate_behaviour(behaviour)?;
        let target = PortalRef::new(behaviour, name);
        let mut updated = current.clone();
        if updated.remove_portal(name).is_none() {
            return Err(ValidationError::UnknownPortal(target).into());
        }

        // The replace runs first, while `index` is still valid; link removals
        // follow in descending order.
        let mut plan = Self::replace(
            index,
            &self.workspace.items()[index],
            CanvasItem::Behaviour(updated),
        );
        let links: Vec<ItemId> = self
            .workspace
            .links()
            .filter(|l| l.touches(&target))
            .map(|l| l.id)
            .collect();
        plan.edits.extend(self.workspace.plan_removal(&links)?);
        Ok(plan)
    }

    fn edit_comment(&self, comment: ItemId, text: &str) -> Result<Plan, ActionError> {
        let (index, item) = self.locate(comment)?;
        let CanvasItem::Comment(current) = item else {
            return Err(ValidationError::WrongItemKind {
                item: comment,
                expected: "comment",
                found: item.kind_name(),
            }
            .into());
        };
        let mut updated = current.clone();
        updated.text = text.to_string();
        Ok(Self::replace(index, item, CanvasItem::Comment(updated)))
    }

    fn rename(&self, id: ItemId, alias: &str) -> Result<Plan, ActionError> {
        let (index, item) = self.locate(id)?;
        let updated = match item {
            CanvasItem::Behaviour(b) => {
                let mut b = b.clone();
                b.alias = alias.to_string();
                CanvasItem::Behaviour(b)
            }
            CanvasItem::Portal(p) => {
                let mut p = p.clone();
                p.alias = alias.to_string();
                CanvasItem::Portal(p)
            }
            other => {
                return Err(ValidationError::WrongItemKind {
                    item: id,
                    expected: "behaviour",
                    found: other.kind_name(),
                }
                .into());
            }
        };
        Ok(Self::replace(index, item, updated))
    }

    fn set_portal_value(&self, target: &PortalRef, value: &PortalValue) -> Result<Plan, ActionError> {
        let (index, item) = self.locate(target.item)?;
        let mut updated = item.clone();
        updated
            .portal_mut(&target.portal)
            .ok_or_else(|| ValidationError::UnknownPortal(target.clone()))?
            .set_value(value.clone())?;
        Ok(Self::replace(index, item, updated))
    }

    fn move_items(&self, ids: &[ItemId], dx: i32, dy: i32) -> Result<Plan, ActionError> {
        let mut plan = Plan::empty();
        for &id in ids.iter().unique() {
            let (index, item) = self.locate(id)?;
            let Some(position) = item.position() else {
                continue;
            };
            let mut updated = item.clone();
            updated.set_position(position.offset(dx, dy));
            plan.edits.extend(Self::replace(index, item, updated).edits);
        }
        plan.primary = ids.first().copied();
        Ok(plan)
    }

    fn remove_items(&self, ids: &[ItemId]) -> Result<Plan, ActionError> {
        let edits = self.workspace.plan_removal(ids)?;
        Ok(Plan {
            edits,
            primary: None,
        })
    }
}
