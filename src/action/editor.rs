use super::Action;
use super::history::History;
use super::planner::Planner;
use crate::canvas::ItemId;
use crate::dragdrop::DropPayload;
use crate::error::ActionError;
use crate::portal::TypeRules;
use crate::registry::{MemoryResources, MemoryTemplates, ResourceId, ResourceLookup, TemplateRegistry};
use crate::workspace::{Edit, Workspace};
use tracing::{debug, warn};

/// Answer to an unsaved-changes prompt when closing a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseDecision {
    Proceed,
    Cancel,
}

/// Binds a workspace to its history and collaborators and applies actions to it.
///
/// Every successful [`Editor::do_action`], [`Editor::undo`] and
/// [`Editor::redo`] fires the workspace `change` signal exactly once.
/// Rejected actions fire nothing and change nothing.
pub struct Editor {
    pub(super) workspace: Workspace,
    history: History,
    templates: Box<dyn TemplateRegistry>,
    resources: Box<dyn ResourceLookup>,
    container: Option<ResourceId>,
}

/// Configures an [`Editor`].
///
/// # Example
///
/// ```rust
/// use kairo::prelude::*;
///
/// let templates = MemoryTemplates::new().with_template(
///     "delay",
///     BehaviourDefinition::new("Delay")
///         .with_portal(PortalDefinition::new("Start", PortalKind::Input, DataType::Bool))
///         .with_portal(PortalDefinition::new("Done", PortalKind::Output, DataType::Bool)),
/// );
/// let mut editor = Editor::builder().with_templates(templates).build();
///
/// let id = editor
///     .do_action(Action::CreateBehaviour { template: "delay".into(), x: 103, y: 207 })
///     .unwrap()
///     .unwrap();
/// assert_eq!(editor.workspace().item(id).unwrap().position().unwrap().left(), 100);
/// ```
pub struct EditorBuilder {
    workspace: Option<Workspace>,
    rules: Option<TypeRules>,
    templates: Box<dyn TemplateRegistry>,
    resources: Box<dyn ResourceLookup>,
    container: Option<ResourceId>,
    history_limit: Option<usize>,
}

impl Default for EditorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorBuilder {
    pub fn new() -> Self {
        Self {
            workspace: None,
            rules: None,
            templates: Box::new(MemoryTemplates::new()),
            resources: Box::new(MemoryResources::new()),
            container: None,
            history_limit: None,
        }
    }

    /// Starts from an existing workspace, e.g. one rebuilt from a snapshot.
    pub fn with_workspace(mut self, workspace: Workspace) -> Self {
        self.workspace = Some(workspace);
        self
    }

    pub fn with_type_rules(mut self, rules: TypeRules) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn with_templates(mut self, templates: impl TemplateRegistry + 'static) -> Self {
        self.templates = Box::new(templates);
        self
    }

    pub fn with_resources(mut self, resources: impl ResourceLookup + 'static) -> Self {
        self.resources = Box::new(resources);
        self
    }

    /// The id of the container being edited; enables the instance cycle guard.
    pub fn with_container(mut self, container: impl Into<ResourceId>) -> Self {
        self.container = Some(container.into());
        self
    }

    /// Caps the undo stack. Unbounded by default.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = Some(limit);
        self
    }

    pub fn build(self) -> Editor {
        let mut workspace = self.workspace.unwrap_or_default();
        if let Some(rules) = self.rules {
            workspace.set_rules(rules);
        }
        Editor {
            workspace,
            history: History::new(self.history_limit),
            templates: self.templates,
            resources: self.resources,
            container: self.container,
        }
    }
}

impl Default for Editor {
    fn default() -> Self {
        EditorBuilder::new().build()
    }
}

impl Editor {
    pub fn builder() -> EditorBuilder {
        EditorBuilder::new()
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Mutable access for selection and subscriptions. Item edits made
    /// through it are not recorded in history.
    pub fn workspace_mut(&mut self) -> &mut Workspace {
        &mut self.workspace
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn container(&self) -> Option<&ResourceId> {
        self.container.as_ref()
    }

    /// Validates and applies an action, records it, then fires `change`.
    ///
    /// Returns the id of the item the action created or primarily touched.
    /// Actions that turn out to change nothing are not recorded and do not
    /// notify.
    pub fn do_action(&mut self, action: Action) -> Result<Option<ItemId>, ActionError> {
        let planner = Planner::new(
            &self.workspace,
            self.templates.as_ref(),
            self.resources.as_ref(),
            self.container.as_ref(),
        );
        let plan = match planner.plan(&action) {
            Ok(plan) => plan,
            Err(e) => {
                debug!(action = action.kind(), error = %e, "action rejected");
                return Err(e);
            }
        };
        if plan.edits.is_empty() {
            return Ok(plan.primary);
        }

        self.workspace.apply_edits(&plan.edits)?;
        debug!(action = action.kind(), edits = plan.edits.len(), "action applied");
        self.history.record(action.kind(), plan.edits);
        self.workspace.notify();
        Ok(plan.primary)
    }

    /// Reverts the most recent action. Returns `false` if there was nothing to undo.
    pub fn undo(&mut self) -> Result<bool, ActionError> {
        let Some(record) = self.history.pop_undo() else {
            return Ok(false);
        };
        let inverse = Edit::invert_all(&record.edits);
        if let Err(violation) = self.workspace.apply_edits(&inverse) {
            self.history.push_undo(record);
            return Err(violation.into());
        }
        debug!(action = record.kind, "undone");
        self.history.push_redo(record);
        self.workspace.notify();
        Ok(true)
    }

    /// Re-applies the most recently undone action. Returns `false` if there was nothing to redo.
    pub fn redo(&mut self) -> Result<bool, ActionError> {
        let Some(record) = self.history.pop_redo() else {
            return Ok(false);
        };
        if let Err(violation) = self.workspace.apply_edits(&record.edits) {
            self.history.push_redo(record);
            return Err(violation.into());
        }
        debug!(action = record.kind, "redone");
        self.history.push_undo(record);
        self.workspace.notify();
        Ok(true)
    }

    /// Handles a drag/drop payload at raw canvas coordinates.
    ///
    /// Malformed payloads are logged and ignored (`Ok(None)`); unresolvable
    /// ids and guard trips are reported as errors.
    pub fn handle_drop(&mut self, payload: &str, x: i32, y: i32) -> Result<Option<ItemId>, ActionError> {
        match payload.parse::<DropPayload>() {
            Ok(payload) => self.do_action(payload.into_action(x, y)),
            Err(e) => {
                warn!(error = %e, "ignoring malformed drop payload");
                Ok(None)
            }
        }
    }

    /// Records that the current state has been persisted.
    pub fn mark_saved(&mut self) {
        self.history.mark_saved();
    }

    pub fn is_dirty(&self) -> bool {
        self.history.is_dirty()
    }

    /// Decides whether the container may be closed. `confirm` is only asked
    /// when there are unsaved changes; returning `true` from it proceeds.
    pub fn request_close(&self, confirm: impl FnOnce() -> bool) -> CloseDecision {
        if !self.is_dirty() || confirm() {
            CloseDecision::Proceed
        } else {
            CloseDecision::Cancel
        }
    }
}
