//! Tests for the connection-authoring and drag state machines.
mod common;
use agentflow::prelude::*;
use agentflow::store::{CATALOG_KEY, CURRENT_FLOW_KEY, MemoryStore};
use common::{FailingStore, connections_of, create_fan_out_graph, create_full_flow};

fn header_down(
    controller: &mut InteractionController,
    graph: &mut FlowGraph,
    id: &str,
    x: f64,
    y: f64,
) -> InteractionOutcome {
    controller.pointer_down(graph, id, Position::new(x, y), PointerRegion::Header)
}

#[test]
fn test_connection_mode_picks_source_then_target() {
    let mut graph = create_fan_out_graph();
    let mut controller = InteractionController::new();

    controller.enter_connection_mode();
    assert_eq!(
        *controller.connection_state(),
        ConnectionState::AwaitingTarget(None)
    );

    assert_eq!(
        controller.click_node(&mut graph, "B"),
        InteractionOutcome::SourceSelected {
            node_id: "B".to_string()
        }
    );
    assert_eq!(
        *controller.connection_state(),
        ConnectionState::AwaitingTarget(Some("B".to_string()))
    );

    assert_eq!(
        controller.click_node(&mut graph, "C"),
        InteractionOutcome::Connected {
            source_id: "B".to_string(),
            target_id: "C".to_string()
        }
    );
    assert_eq!(connections_of(&graph, "B"), vec!["C"]);
    assert_eq!(
        *controller.connection_state(),
        ConnectionState::AwaitingTarget(None)
    );
}

#[test]
fn test_clicking_source_again_is_noop() {
    let mut graph = create_fan_out_graph();
    let mut controller = InteractionController::new();
    controller.enter_connection_mode();
    controller.click_node(&mut graph, "A");

    assert_eq!(controller.click_node(&mut graph, "A"), InteractionOutcome::None);
    assert_eq!(
        *controller.connection_state(),
        ConnectionState::AwaitingTarget(Some("A".to_string()))
    );
    assert_eq!(connections_of(&graph, "A"), vec!["B", "C"]);
}

#[test]
fn test_duplicate_connection_is_rejected_and_resets_source() {
    let mut graph = create_fan_out_graph();
    let mut controller = InteractionController::new();
    controller.enter_connection_mode();
    controller.click_node(&mut graph, "A");

    let outcome = controller.click_node(&mut graph, "B");
    assert!(matches!(
        outcome,
        InteractionOutcome::Rejected(GraphError::DuplicateConnection { .. })
    ));
    assert_eq!(connections_of(&graph, "A"), vec!["B", "C"]);
    assert_eq!(
        *controller.connection_state(),
        ConnectionState::AwaitingTarget(None)
    );
}

#[test]
fn test_exit_connection_mode_discards_source() {
    let mut graph = create_fan_out_graph();
    let mut controller = InteractionController::new();
    controller.enter_connection_mode();
    controller.click_node(&mut graph, "B");

    controller.exit_connection_mode();
    assert_eq!(*controller.connection_state(), ConnectionState::Idle);
    assert!(!controller.is_connection_mode());

    // Clicks do nothing outside connection mode.
    assert_eq!(controller.click_node(&mut graph, "C"), InteractionOutcome::None);
    assert!(connections_of(&graph, "B").is_empty());
}

#[test]
fn test_toggle_connection_mode() {
    let mut controller = InteractionController::new();
    controller.toggle_connection_mode();
    assert!(controller.is_connection_mode());
    controller.toggle_connection_mode();
    assert_eq!(*controller.connection_state(), ConnectionState::Idle);
}

#[test]
fn test_click_unknown_node_is_rejected() {
    let mut graph = create_fan_out_graph();
    let mut controller = InteractionController::new();
    controller.enter_connection_mode();

    assert_eq!(
        controller.click_node(&mut graph, "ghost"),
        InteractionOutcome::Rejected(GraphError::NodeNotFound("ghost".to_string()))
    );
    assert_eq!(
        *controller.connection_state(),
        ConnectionState::AwaitingTarget(None)
    );
}

#[test]
fn test_drag_keeps_grab_offset() {
    let mut graph = create_fan_out_graph();
    let mut controller = InteractionController::new();

    // Node B sits at (100, 300); grab it 15px right and 10px down of its origin.
    let outcome = header_down(&mut controller, &mut graph, "B", 115.0, 310.0);
    assert_eq!(
        outcome,
        InteractionOutcome::DragStarted {
            node_id: "B".to_string()
        }
    );
    assert_eq!(
        *controller.drag_state(),
        DragState::Dragging {
            node_id: "B".to_string(),
            offset: Position::new(15.0, 10.0)
        }
    );

    controller.pointer_move(&mut graph, Position::new(40.0, -20.0));
    let outcome = controller.pointer_move(&mut graph, Position::new(515.0, 710.0));
    assert_eq!(
        outcome,
        InteractionOutcome::Moved {
            node_id: "B".to_string(),
            position: Position::new(500.0, 700.0)
        }
    );
    assert_eq!(graph.node("B").unwrap().position, Position::new(500.0, 700.0));

    assert_eq!(
        controller.pointer_up(),
        InteractionOutcome::DragEnded {
            node_id: "B".to_string()
        }
    );
    assert_eq!(*controller.drag_state(), DragState::NotDragging);
    assert_eq!(
        controller.pointer_move(&mut graph, Position::new(0.0, 0.0)),
        InteractionOutcome::None
    );
    assert_eq!(graph.node("B").unwrap().position, Position::new(500.0, 700.0));
}

#[test]
fn test_pointer_leave_ends_drag() {
    let mut graph = create_fan_out_graph();
    let mut controller = InteractionController::new();
    header_down(&mut controller, &mut graph, "A", 100.0, 100.0);

    assert!(matches!(
        controller.pointer_leave(),
        InteractionOutcome::DragEnded { .. }
    ));
    assert_eq!(controller.pointer_leave(), InteractionOutcome::None);
}

#[test]
fn test_content_region_never_drags() {
    let mut graph = create_fan_out_graph();
    let mut controller = InteractionController::new();

    let outcome =
        controller.pointer_down(&mut graph, "A", Position::new(120.0, 140.0), PointerRegion::Content);
    assert_eq!(outcome, InteractionOutcome::None);
    assert_eq!(*controller.drag_state(), DragState::NotDragging);
}

#[test]
fn test_connection_mode_pointer_down_never_drags() {
    let mut graph = create_fan_out_graph();
    let mut controller = InteractionController::new();
    controller.enter_connection_mode();

    let outcome = header_down(&mut controller, &mut graph, "B", 100.0, 300.0);
    assert_eq!(
        outcome,
        InteractionOutcome::SourceSelected {
            node_id: "B".to_string()
        }
    );
    assert_eq!(*controller.drag_state(), DragState::NotDragging);

    header_down(&mut controller, &mut graph, "C", 450.0, 300.0);
    assert_eq!(connections_of(&graph, "B"), vec!["C"]);
    assert_eq!(*controller.drag_state(), DragState::NotDragging);
}

#[test]
fn test_entering_connection_mode_ends_drag() {
    let mut graph = create_fan_out_graph();
    let mut controller = InteractionController::new();
    header_down(&mut controller, &mut graph, "A", 100.0, 100.0);

    controller.enter_connection_mode();
    assert_eq!(*controller.drag_state(), DragState::NotDragging);
}

#[test]
fn test_delete_node_clears_state_that_refers_to_it() {
    let mut graph = create_fan_out_graph();
    let mut controller = InteractionController::new();

    header_down(&mut controller, &mut graph, "C", 450.0, 300.0);
    assert!(controller.delete_node(&mut graph, "C").is_some());
    assert_eq!(*controller.drag_state(), DragState::NotDragging);

    controller.enter_connection_mode();
    controller.click_node(&mut graph, "B");
    controller.delete_node(&mut graph, "B");
    assert_eq!(
        *controller.connection_state(),
        ConnectionState::AwaitingTarget(None)
    );
    assert!(connections_of(&graph, "A").is_empty());
}

#[test]
fn test_save_flow_rejects_blank_names_without_writing() {
    let controller = InteractionController::new();
    let mut store = FlowStore::new(MemoryStore::new());

    for name in ["", "   ", "\t\n"] {
        let mut flow = Flow::new(name);
        let err = controller.save_flow(&mut flow, &mut store).unwrap_err();
        assert_eq!(err, EditorError::Validation(ValidationError::EmptyName));
        assert_eq!(flow.id, None);
    }
    assert!(store.backend().is_empty());
}

#[test]
fn test_save_flow_writes_record_current_and_summary() {
    let controller = InteractionController::new();
    let mut store = FlowStore::new(MemoryStore::new());
    let mut flow = Flow::new("Greeter");
    flow.graph.add_node(NodeType::Message, Position::new(100.0, 100.0));

    let summary = controller.save_flow(&mut flow, &mut store).unwrap();
    let id = flow.id.clone().unwrap();

    assert_eq!(summary.id, id);
    assert_eq!(summary.name, "Greeter");
    assert_eq!(summary.status, FlowStatus::Draft);
    assert_eq!(Some(summary.created_at), flow.created_at);
    assert_eq!(store.load_flow(&id).unwrap(), Some(flow.clone()));
    assert_eq!(store.load_current().unwrap(), Some(flow.clone()));
    assert_eq!(store.list_summaries().unwrap(), vec![summary.clone()]);

    // Saving again keeps identity and overwrites.
    let created_at = flow.created_at;
    flow.name = "Greeter v2".to_string();
    let again = controller.save_flow(&mut flow, &mut store).unwrap();
    assert_eq!(again.id, id);
    assert_eq!(flow.created_at, created_at);
    assert_eq!(store.list_summaries().unwrap().len(), 1);
    assert_eq!(store.list_summaries().unwrap()[0].name, "Greeter v2");
}

#[test]
fn test_failed_save_keeps_flow_unsaved() {
    let controller = InteractionController::new();
    let mut store = FlowStore::new(MemoryStore::disabled());
    let mut flow = Flow::new("Offline");
    flow.graph.add_node(NodeType::Input, Position::default());
    let before = flow.clone();

    let err = controller.save_flow(&mut flow, &mut store).unwrap_err();
    assert!(matches!(err, EditorError::Store(StoreError::Storage(_))));
    assert_eq!(flow, before);
}

#[test]
fn test_failed_working_record_write_leaves_no_orphan() {
    let controller = InteractionController::new();
    let mut store = FlowStore::new(FailingStore::failing_on(CURRENT_FLOW_KEY));
    let mut flow = Flow::new("Half Written");
    flow.graph.add_node(NodeType::Message, Position::default());

    // Retrying must not pile up records under fresh ids either.
    for _ in 0..3 {
        assert!(controller.save_flow(&mut flow, &mut store).is_err());
        assert_eq!(flow.id, None);
        assert!(store.backend().inner.is_empty());
    }
}

#[test]
fn test_failed_catalog_write_restores_working_record() {
    let controller = InteractionController::new();
    let mut store = FlowStore::new(FailingStore::failing_on(CATALOG_KEY));
    let previous = create_full_flow();
    store
        .backend_mut()
        .inner
        .set(CURRENT_FLOW_KEY, &serializer::to_json_string(&previous))
        .unwrap();

    let mut flow = Flow::new("Replacement");
    flow.graph.add_node(NodeType::Webhook, Position::default());
    let err = controller.save_flow(&mut flow, &mut store).unwrap_err();

    assert!(matches!(err, EditorError::Store(StoreError::Storage(_))));
    assert_eq!(flow.id, None);
    assert_eq!(store.backend().inner.len(), 1);
    assert_eq!(store.load_current().unwrap(), Some(previous));
    assert!(store.list_summaries().unwrap().is_empty());
}

#[test]
fn test_deploy_flow_writes_active_status_once() {
    let controller = InteractionController::new();
    let mut store = FlowStore::new(MemoryStore::new());
    let mut flow = Flow::new("Live");

    let summary = controller.deploy_flow(&mut flow, &mut store).unwrap();
    assert_eq!(summary.status, FlowStatus::Active);
    assert_eq!(store.list_summaries().unwrap(), vec![summary]);
    assert!(flow.is_persisted());
}
