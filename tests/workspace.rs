//! Workspace tests
//!
//! Direct item management, selection, change notification and invariant checks.
mod common;
use common::*;
use kairo::prelude::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

fn comment(workspace: &Workspace, text: &str) -> CanvasItem {
    CanvasItem::Comment(Comment::new(workspace.next_id(), Position::snapped(0, 0), text))
}

fn container_portal(workspace: &Workspace, name: &str, kind: PortalKind) -> CanvasItem {
    let portal = Portal::from_definition(&PortalDefinition::new(name, kind, DataType::Bool)).unwrap();
    CanvasItem::Portal(ContainerPortal::new(
        workspace.next_id(),
        Position::snapped(0, 0),
        portal,
    ))
}

#[cfg(test)]
mod item_tests {
    use super::*;

    #[test]
    fn test_add_item_appends_and_notifies_once() {
        let mut workspace = Workspace::new();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        workspace.subscribe(move |_: &Workspace| counter.set(counter.get() + 1));

        let first = workspace.add_item(comment(&workspace, "first")).unwrap();
        let second = workspace.add_item(comment(&workspace, "second")).unwrap();

        assert_eq!(workspace.len(), 2);
        assert_eq!(workspace.items()[0].id(), first);
        assert_eq!(workspace.items()[1].id(), second);
        assert_ne!(first, second);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_added_items_stay_on_the_grid() {
        let mut workspace = Workspace::new();
        let id = workspace.next_id();
        let item = CanvasItem::Comment(Comment::new(id, Position::snapped(3, 7), "note"));
        workspace.add_item(item).unwrap();

        let position = workspace.item(id).unwrap().position().unwrap();
        assert_eq!((position.left(), position.top()), (0, 0));
        assert!(position.is_snapped());

        // a reload keeps the stored position exactly
        let rebuilt = Workspace::from_snapshot(workspace.to_snapshot(), TypeRules::default()).unwrap();
        assert_eq!(rebuilt.item(id).unwrap().position(), Some(position));
        workspace.check_invariants().unwrap();
    }

    #[test]
    fn test_add_item_rejects_duplicate_id() {
        let mut workspace = Workspace::new();
        let item = comment(&workspace, "note");
        workspace.add_item(item.clone()).unwrap();

        let result = workspace.add_item(item);
        assert!(matches!(
            result,
            Err(ActionError::Validation(ValidationError::DuplicateItem(_)))
        ));
        assert_eq!(workspace.len(), 1);
    }

    #[test]
    fn test_add_item_rejects_duplicate_container_portal_name() {
        let mut workspace = Workspace::new();
        workspace
            .add_item(container_portal(&workspace, "Start", PortalKind::Input))
            .unwrap();

        let result = workspace.add_item(container_portal(&workspace, "Start", PortalKind::Output));
        match result {
            Err(ActionError::Validation(ValidationError::DuplicatePortalName(name))) => {
                assert_eq!(name, "Start")
            }
            other => panic!("Expected DuplicatePortalName, got {:?}", other),
        }
        assert_eq!(workspace.container_portals().count(), 1);
    }

    #[test]
    fn test_add_item_rejects_link_to_missing_portal() {
        let mut workspace = Workspace::new();
        let start = workspace
            .add_item(container_portal(&workspace, "Start", PortalKind::Output))
            .unwrap();
        let link = CanvasItem::Link(Link::new(
            workspace.next_id(),
            PortalRef::new(start, "Start"),
            PortalRef::new(ItemId(99), "Execute"),
        ));

        let result = workspace.add_item(link);
        assert!(matches!(
            result,
            Err(ActionError::Validation(ValidationError::UnknownPortal(_)))
        ));
        assert_eq!(workspace.links().count(), 0);
    }

    #[test]
    fn test_remove_item_cascades_to_links_with_one_notification() {
        let mut editor = create_editor();
        let timer = create(&mut editor, "timer", 0, 0);
        let log = create(&mut editor, "log", 200, 0);
        let other = create(&mut editor, "log", 200, 100);
        link(&mut editor, PortalRef::new(timer, "Elapsed"), PortalRef::new(log, "Execute"));
        link(&mut editor, PortalRef::new(timer, "Elapsed"), PortalRef::new(other, "Execute"));

        let changes = count_changes(&mut editor);
        let removed = editor.workspace_mut().remove_item(timer).unwrap();

        assert_eq!(removed.id(), timer);
        assert_eq!(editor.workspace().links().count(), 0);
        assert_eq!(editor.workspace().len(), 2);
        assert_eq!(changes.get(), 1);
        editor.workspace().check_invariants().unwrap();
    }

    #[test]
    fn test_remove_unknown_item_fails_without_notifying() {
        let mut workspace = Workspace::new();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        workspace.subscribe(move |_: &Workspace| counter.set(counter.get() + 1));

        let result = workspace.remove_item(ItemId(42));
        assert!(matches!(
            result,
            Err(ActionError::Validation(ValidationError::UnknownItem(ItemId(42))))
        ));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_next_id_is_never_reused_after_removal() {
        let mut workspace = Workspace::new();
        let first = workspace.add_item(comment(&workspace, "a")).unwrap();
        workspace.remove_item(first).unwrap();
        let second = workspace.add_item(comment(&workspace, "b")).unwrap();
        assert!(second > first);
    }
}

#[cfg(test)]
mod back_reference_tests {
    use super::*;

    #[test]
    fn test_portal_back_references_follow_links() {
        let mut editor = create_editor();
        let timer = create(&mut editor, "timer", 0, 0);
        let log = create(&mut editor, "log", 200, 0);
        let id = link(&mut editor, PortalRef::new(timer, "Elapsed"), PortalRef::new(log, "Execute"));

        let workspace = editor.workspace();
        let source = workspace.portal(&PortalRef::new(timer, "Elapsed")).unwrap();
        let target = workspace.portal(&PortalRef::new(log, "Execute")).unwrap();
        assert_eq!(source.links(), &[id]);
        assert_eq!(target.links(), &[id]);

        editor.workspace_mut().remove_item(id).unwrap();
        let source = editor.workspace().portal(&PortalRef::new(timer, "Elapsed")).unwrap();
        assert!(source.links().is_empty());
    }

    #[test]
    fn test_check_invariants_holds_through_edits() {
        let mut editor = create_editor();
        let timer = create(&mut editor, "timer", 0, 0);
        let scale = create(&mut editor, "scale", 200, 0);
        link(&mut editor, PortalRef::new(timer, "Ticks"), PortalRef::new(scale, "Factor"));
        link(&mut editor, PortalRef::new(timer, "Ticks"), PortalRef::new(scale, "Target"));
        editor.workspace().check_invariants().unwrap();

        editor.undo().unwrap();
        editor.workspace().check_invariants().unwrap();
    }
}

#[cfg(test)]
mod selection_tests {
    use super::*;

    fn three_items() -> (Editor, Vec<ItemId>) {
        let mut editor = create_editor();
        let ids = vec![
            create(&mut editor, "timer", 0, 0),
            create(&mut editor, "log", 100, 0),
            create(&mut editor, "scale", 200, 0),
        ];
        (editor, ids)
    }

    #[test]
    fn test_plain_click_selects_only_target() {
        let (mut editor, ids) = three_items();
        let workspace = editor.workspace_mut();

        workspace.click(Some(ids[0]), false);
        workspace.click(Some(ids[1]), false);

        assert_eq!(workspace.selection().len(), 1);
        assert!(workspace.selection().contains(ids[1]));
    }

    #[test]
    fn test_modifier_click_toggles_membership() {
        let (mut editor, ids) = three_items();
        let workspace = editor.workspace_mut();

        workspace.click(Some(ids[0]), true);
        workspace.click(Some(ids[2]), true);
        assert_eq!(workspace.selection().len(), 2);

        workspace.click(Some(ids[0]), true);
        assert_eq!(workspace.selection().iter().collect::<Vec<_>>(), vec![ids[2]]);
    }

    #[test]
    fn test_click_on_empty_space_clears_selection() {
        let (mut editor, ids) = three_items();
        let workspace = editor.workspace_mut();
        workspace.set_selection(ids.clone());
        assert_eq!(workspace.selection().len(), 3);

        workspace.click(None, true);
        assert_eq!(workspace.selection().len(), 3);

        workspace.click(None, false);
        assert!(workspace.selection().is_empty());
    }

    #[test]
    fn test_selection_ignores_unknown_ids() {
        let (mut editor, ids) = three_items();
        let workspace = editor.workspace_mut();
        workspace.set_selection([ids[0], ItemId(1000)]);
        assert_eq!(workspace.selection().len(), 1);

        workspace.click(Some(ItemId(1000)), false);
        assert!(workspace.selection().contains(ids[0]));
    }

    #[test]
    fn test_selection_change_notifies_only_when_changed() {
        let (mut editor, ids) = three_items();
        let changes = count_changes(&mut editor);
        let workspace = editor.workspace_mut();

        workspace.click(Some(ids[0]), false);
        workspace.click(Some(ids[0]), false);
        workspace.clear_selection();
        workspace.clear_selection();

        assert_eq!(changes.get(), 2);
    }

    #[test]
    fn test_removed_items_leave_the_selection() {
        let (mut editor, ids) = three_items();
        editor.workspace_mut().set_selection(ids.clone());
        editor.workspace_mut().remove_item(ids[1]).unwrap();

        let selection = editor.workspace().selection();
        assert_eq!(selection.len(), 2);
        assert!(!selection.contains(ids[1]));
    }
}

#[cfg(test)]
mod observer_tests {
    use super::*;

    #[test]
    fn test_every_observer_is_called_in_subscription_order() {
        let mut workspace = Workspace::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for name in ["canvas", "inspector", "outline"] {
            let log = Rc::clone(&log);
            workspace.subscribe(move |_: &Workspace| log.borrow_mut().push(name));
        }

        workspace.add_item(comment(&workspace, "note")).unwrap();
        assert_eq!(*log.borrow(), vec!["canvas", "inspector", "outline"]);
    }

    #[test]
    fn test_observers_see_the_committed_state() {
        let mut workspace = Workspace::new();
        let seen = Rc::new(Cell::new(0));
        let sink = Rc::clone(&seen);
        workspace.subscribe(move |ws: &Workspace| sink.set(ws.len()));

        workspace.add_item(comment(&workspace, "a")).unwrap();
        workspace.add_item(comment(&workspace, "b")).unwrap();
        assert_eq!(seen.get(), 2);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let mut workspace = Workspace::new();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let id = workspace.subscribe(move |_: &Workspace| counter.set(counter.get() + 1));

        workspace.add_item(comment(&workspace, "a")).unwrap();
        assert!(workspace.unsubscribe(id));
        assert!(!workspace.unsubscribe(id));
        workspace.add_item(comment(&workspace, "b")).unwrap();

        assert_eq!(calls.get(), 1);
    }
}
