//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the kairo crate.
//! Import this module to get access to the core functionality without having to import
//! each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use kairo::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! // Load a saved container and open it for editing
//! let json = std::fs::read_to_string("path/to/container.json")?;
//! let snapshot = WorkspaceSnapshot::from_json(&json)?;
//! let workspace = Workspace::from_snapshot(snapshot, TypeRules::default())?;
//!
//! let mut editor = Editor::builder().with_workspace(workspace).build();
//! editor.do_action(Action::CreateComment { text: "Intro sequence".into(), x: 12, y: 48 })?;
//!
//! println!("{} items", editor.workspace().len());
//! # Ok(())
//! # }
//! ```

// Editing
pub use crate::action::{Action, CloseDecision, Editor, EditorBuilder, History};
pub use crate::dragdrop::DropPayload;
pub use crate::workspace::{ChangeObserver, RouteOutcome, Selection, SubscriptionId, Workspace};

// Graph model
pub use crate::canvas::{
    Behaviour, BehaviourOrigin, CanvasItem, Comment, ContainerPortal, ItemId, Link, Position,
};
pub use crate::portal::{
    DataType, Portal, PortalDefinition, PortalKind, PortalRef, PortalValue, TypeRules,
};

// Collaborators
pub use crate::registry::{
    BehaviourDefinition, MemoryResources, MemoryTemplates, ProjectResource, ResourceId,
    ResourceLookup, TemplateId, TemplateRegistry,
};

// Persistence
pub use crate::snapshot::{SnapshotArtifact, SnapshotItem, WorkspaceSnapshot};

// Error types
pub use crate::error::{ActionError, ReferenceError, SnapshotError, ValidationError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
