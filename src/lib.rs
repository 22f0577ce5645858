//! # Kairo - Behaviour Graph Editing Core
//!
//! **Kairo** is the model behind a visual editor for behaviour graphs: typed
//! nodes (behaviours) wired together through typed ports (portals), plus
//! container-level portals and free-text comments. It owns the rules for
//! which portals may be linked, applies every edit as a reversible action,
//! and tells any number of views when the graph changed. Rendering, storage
//! and networking stay outside; the crate consumes them through small traits.
//!
//! ## Core Workflow
//!
//! 1.  **Provide Collaborators**: Implement [`registry::TemplateRegistry`] and
//!     [`registry::ResourceLookup`] for your application, or use the in-memory
//!     versions.
//! 2.  **Build an Editor**: Use [`Editor::builder`](action::Editor::builder) to wire
//!     collaborators, type rules and an optional starting workspace together.
//! 3.  **Subscribe Views**: Register observers on the workspace; each one is
//!     called after every committed change and re-reads what it renders.
//! 4.  **Apply Actions**: Translate gestures into [`action::Action`]s, route
//!     links with `begin_route`/`complete_route`, and undo/redo freely.
//! 5.  **Snapshot**: Take a [`snapshot::WorkspaceSnapshot`] at any time to save
//!     it, and rebuild a workspace from one when loading.
//!
//! ## Quick Start
//!
//! ```rust
//! use kairo::prelude::*;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! fn main() -> Result<()> {
//!     // 1. Register the templates your palette offers.
//!     let templates = MemoryTemplates::new()
//!         .with_template(
//!             "timer",
//!             BehaviourDefinition::new("Timer")
//!                 .with_portal(PortalDefinition::new("Elapsed", PortalKind::Output, DataType::Bool)),
//!         )
//!         .with_template(
//!             "log",
//!             BehaviourDefinition::new("Log")
//!                 .with_portal(PortalDefinition::new("Execute", PortalKind::Input, DataType::Bool)),
//!         );
//!
//!     // 2. Build the editor.
//!     let mut editor = Editor::builder().with_templates(templates).build();
//!
//!     // 3. Count change notifications the way a view would react to them.
//!     let changes = Rc::new(Cell::new(0));
//!     let counter = Rc::clone(&changes);
//!     editor
//!         .workspace_mut()
//!         .subscribe(move |_: &Workspace| counter.set(counter.get() + 1));
//!
//!     // 4. Drop two nodes and wire them together.
//!     let timer = editor.handle_drop(r#"{"type":"template","id":"timer"}"#, 103, 207)?.unwrap();
//!     let log = editor.handle_drop(r#"{"type":"template","id":"log"}"#, 300, 200)?.unwrap();
//!
//!     editor.begin_route(PortalRef::new(timer, "Elapsed"))?;
//!     let outcome = editor.complete_route(Some(PortalRef::new(log, "Execute")))?;
//!     assert!(matches!(outcome, RouteOutcome::Committed(_)));
//!
//!     // 5. Undo the link, then snapshot the graph for saving.
//!     editor.undo()?;
//!     let snapshot = editor.workspace().to_snapshot();
//!     assert_eq!(snapshot.items.len(), 2);
//!     assert!(changes.get() >= 4);
//!     Ok(())
//! }
//! ```

pub mod action;
pub mod canvas;
pub mod dragdrop;
pub mod error;
pub mod portal;
pub mod prelude;
pub mod registry;
pub mod snapshot;
pub mod workspace;
