use super::{Action, Editor};
use crate::error::{ActionError, ValidationError};
use crate::portal::PortalRef;
use crate::workspace::{DraftLink, RouteOutcome};
use tracing::debug;

/// The interactive link gesture: `Idle -> Routing -> Committed | Cancelled`.
impl Editor {
    /// Starts routing a link from an output or product portal.
    pub fn begin_route(&mut self, source: PortalRef) -> Result<(), ActionError> {
        if let Some(draft) = self.workspace.active_link() {
            return Err(ValidationError::RoutingInProgress(draft.source.clone()).into());
        }
        let portal = self
            .workspace
            .portal(&source)
            .ok_or_else(|| ValidationError::UnknownPortal(source.clone()))?;
        let source_kind = portal.kind();
        if !source_kind.is_source() {
            return Err(ValidationError::InvalidRouteSource(source_kind).into());
        }

        debug!(%source, "routing started");
        self.workspace.set_active_link(Some(DraftLink {
            source,
            source_kind,
        }));
        self.workspace.notify();
        Ok(())
    }

    /// Ends the gesture over `candidate`, or over empty space when `None`.
    ///
    /// A compatible candidate commits the link through [`Editor::do_action`],
    /// making it undoable. Anything the link rules refuse cancels the draft
    /// without touching the item list.
    pub fn complete_route(&mut self, candidate: Option<PortalRef>) -> Result<RouteOutcome, ActionError> {
        let draft = self
            .workspace
            .take_active_link()
            .ok_or(ValidationError::NotRouting)?;

        let Some(target) = candidate else {
            debug!(source = %draft.source, "routing cancelled over empty space");
            self.workspace.notify();
            return Ok(RouteOutcome::Cancelled);
        };

        let action = Action::CreateLink {
            source: draft.source,
            target,
        };
        match self.do_action(action) {
            Ok(Some(id)) => Ok(RouteOutcome::Committed(id)),
            Ok(None) => Ok(RouteOutcome::Cancelled),
            Err(ActionError::Validation(e)) => {
                debug!(error = %e, "routing cancelled");
                self.workspace.notify();
                Ok(RouteOutcome::Cancelled)
            }
            Err(e) => Err(e),
        }
    }

    /// Abandons the gesture. Returns `false` if nothing was being routed.
    pub fn cancel_route(&mut self) -> bool {
        if self.workspace.take_active_link().is_none() {
            return false;
        }
        self.workspace.notify();
        true
    }

    pub fn is_routing(&self) -> bool {
        self.workspace.active_link().is_some()
    }
}
