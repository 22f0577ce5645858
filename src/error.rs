use crate::canvas::ItemId;
use crate::portal::{DataType, PortalKind, PortalRef};
use thiserror::Error;

/// Errors raised when an edit would break a workspace invariant.
///
/// These are recoverable: the workspace is left untouched and the caller
/// decides how to present the message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("A container portal named '{0}' already exists in this workspace")]
    DuplicatePortalName(String),

    #[error("Behaviour {item} already has a portal named '{name}'")]
    DuplicateBehaviourPortal { item: ItemId, name: String },

    #[error("Item {0} already exists in this workspace")]
    DuplicateItem(ItemId),

    #[error("Item {item} at ({left}, {top}) is not aligned to the grid")]
    OffGrid { item: ItemId, left: i32, top: i32 },

    #[error("Item {0} was not found in this workspace")]
    UnknownItem(ItemId),

    #[error("Portal '{0}' was not found in this workspace")]
    UnknownPortal(PortalRef),

    #[error("Item {item} is a {found}, expected a {expected}")]
    WrongItemKind {
        item: ItemId,
        expected: &'static str,
        found: &'static str,
    },

    #[error(
        "Cannot link {from_kind} portal '{from}' ({from_type}) to {to_kind} portal '{to}' ({to_type})"
    )]
    IncompatibleLink {
        from: PortalRef,
        from_kind: PortalKind,
        from_type: DataType,
        to: PortalRef,
        to_kind: PortalKind,
        to_type: DataType,
    },

    #[error("Portal '{from}' is already linked to '{to}'")]
    DuplicateLink { from: PortalRef, to: PortalRef },

    #[error("Value '{value}' is not a valid {data_type} for portal '{portal}'")]
    ValueTypeMismatch {
        portal: String,
        data_type: DataType,
        value: String,
    },

    #[error("Top-level portal items carry exactly one portal, found {0}")]
    MalformedContainerPortal(usize),

    #[error("Malformed drop payload: {0}")]
    MalformedPayload(String),

    #[error("A link can only be routed from an output or product portal, not a {0} portal")]
    InvalidRouteSource(PortalKind),

    #[error("A link is already being routed from '{0}'")]
    RoutingInProgress(PortalRef),

    #[error("No link is currently being routed")]
    NotRouting,
}

/// Errors raised when a collaborator cannot resolve an identifier.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReferenceError {
    #[error("Template '{0}' is not registered")]
    UnknownTemplate(String),

    #[error("Resource '{0}' could not be found")]
    UnknownResource(String),

    #[error("Container '{0}' could not be found")]
    UnknownContainer(String),
}

/// Raised when a workspace ends up in a state its own edits should never produce.
///
/// This signals a bug in the editor itself, not bad user input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvariantViolation {
    #[error("Edit expected item {expected} at index {index}, found {found:?}")]
    EditMismatch {
        index: usize,
        expected: ItemId,
        found: Option<ItemId>,
    },

    #[error("Link {link} references missing portal '{portal}'")]
    DanglingLink { link: ItemId, portal: PortalRef },

    #[error("Item id {0} appears more than once")]
    DuplicateId(ItemId),

    #[error("Item {0} is not aligned to the grid")]
    OffGrid(ItemId),

    #[error("Container portal name '{0}' appears more than once")]
    DuplicatePortalName(String),

    #[error("Portal '{portal}' has stale back-references")]
    StaleBackReference { portal: PortalRef },
}

/// Errors returned by the action layer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error("Cyclic dependency: container '{container}' already contains an instance of this container")]
    CyclicDependency { container: String },

    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

/// Errors that can occur while reading, writing or rebuilding workspace snapshots.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Failed to parse snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Binary snapshot error: {0}")]
    Binary(String),

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Snapshot is inconsistent: {0}")]
    Invalid(#[from] ValidationError),

    #[error("Snapshot is inconsistent: {0}")]
    Broken(#[from] InvariantViolation),
}
