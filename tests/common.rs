//! Common test utilities for building templates, resources and editors.
use kairo::prelude::*;
use kairo::registry::{AssetResource, ContainerResource, GroupResource};
use kairo::snapshot::NodeRecord;
use std::cell::Cell;
use std::rc::Rc;

/// A palette with a control-flow source, a control-flow sink and a
/// parameterised node.
///
/// - `timer`: output `Elapsed`, product `Ticks` (int)
/// - `log`: input `Execute`, parameter `Message` (string)
/// - `scale`: parameter `Factor` (number), parameter `Target` (object)
#[allow(dead_code)]
pub fn create_templates() -> MemoryTemplates {
    MemoryTemplates::new()
        .with_template(
            "timer",
            BehaviourDefinition::new("Timer")
                .with_portal(PortalDefinition::new("Elapsed", PortalKind::Output, DataType::Bool))
                .with_portal(PortalDefinition::new("Ticks", PortalKind::Product, DataType::Int)),
        )
        .with_template(
            "log",
            BehaviourDefinition::new("Log")
                .with_portal(PortalDefinition::new("Execute", PortalKind::Input, DataType::Bool))
                .with_portal(
                    PortalDefinition::new("Message", PortalKind::Parameter, DataType::String)
                        .with_value(PortalValue::Text("hello".into())),
                ),
        )
        .with_template(
            "scale",
            BehaviourDefinition::new("Scale")
                .with_portal(PortalDefinition::new("Factor", PortalKind::Parameter, DataType::Number))
                .with_portal(PortalDefinition::new("Target", PortalKind::Parameter, DataType::Object)),
        )
}

/// A container portal record as it appears in a saved container.
#[allow(dead_code)]
pub fn portal_record(id: u64, definition: PortalDefinition) -> SnapshotItem {
    SnapshotItem::Portal(NodeRecord {
        id: ItemId(id),
        left: 0,
        top: 0,
        alias: definition.name.clone(),
        origin: None,
        portals: vec![definition],
    })
}

/// An instance node record pointing at `container`.
#[allow(dead_code)]
pub fn instance_record(id: u64, container: &str) -> SnapshotItem {
    SnapshotItem::Instance(NodeRecord {
        id: ItemId(id),
        left: 0,
        top: 0,
        alias: container.to_string(),
        origin: Some(container.to_string()),
        portals: Vec::new(),
    })
}

#[allow(dead_code)]
pub fn container(id: &str, name: &str, items: Vec<SnapshotItem>) -> ProjectResource {
    ProjectResource::Container(ContainerResource {
        id: id.into(),
        name: name.to_string(),
        snapshot: WorkspaceSnapshot { items },
    })
}

/// Project resources:
///
/// - `intro` (container) exposes input `Start` and output `Finished`
/// - `outro` (container) holds an instance of `intro`
/// - `logo` (asset), `heroes` (group)
#[allow(dead_code)]
pub fn create_resources() -> MemoryResources {
    MemoryResources::new()
        .with_resource(container(
            "intro",
            "Intro",
            vec![
                portal_record(1, PortalDefinition::new("Start", PortalKind::Input, DataType::Bool)),
                portal_record(2, PortalDefinition::new("Finished", PortalKind::Output, DataType::Bool)),
            ],
        ))
        .with_resource(container("outro", "Outro", vec![instance_record(1, "intro")]))
        .with_resource(ProjectResource::Asset(AssetResource {
            id: "logo".into(),
            name: "Logo".to_string(),
        }))
        .with_resource(ProjectResource::Group(GroupResource {
            id: "heroes".into(),
            name: "Heroes".to_string(),
        }))
}

/// An editor wired to the standard templates and resources.
#[allow(dead_code)]
pub fn create_editor() -> Editor {
    Editor::builder()
        .with_templates(create_templates())
        .with_resources(create_resources())
        .build()
}

/// Creates a behaviour from a template and returns its id.
#[allow(dead_code)]
pub fn create(editor: &mut Editor, template: &str, x: i32, y: i32) -> ItemId {
    editor
        .do_action(Action::CreateBehaviour {
            template: template.into(),
            x,
            y,
        })
        .expect("template should instantiate")
        .expect("creation returns the new id")
}

/// Links `source` to `target` through the action layer and returns the link id.
#[allow(dead_code)]
pub fn link(editor: &mut Editor, source: PortalRef, target: PortalRef) -> ItemId {
    editor
        .do_action(Action::CreateLink { source, target })
        .expect("link should be accepted")
        .expect("creation returns the new id")
}

/// Subscribes a counter to the editor's workspace and returns it.
#[allow(dead_code)]
pub fn count_changes(editor: &mut Editor) -> Rc<Cell<usize>> {
    let changes = Rc::new(Cell::new(0));
    let counter = Rc::clone(&changes);
    editor
        .workspace_mut()
        .subscribe(move |_: &Workspace| counter.set(counter.get() + 1));
    changes
}
