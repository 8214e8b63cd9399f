//! Tests for `EditorSession`: opening, saving, deploying and flow lifecycle.
mod common;
use agentflow::prelude::*;
use agentflow::store::{CATALOG_KEY, CURRENT_FLOW_KEY, FileStore, MemoryStore};
use common::{FailingStore, connections_of, create_full_flow, create_session};

#[test]
fn test_open_empty_store_starts_default_flow() {
    let session = create_session();
    let flow = session.flow();

    assert_eq!(flow.name, "New Agent Flow");
    assert_eq!(flow.id, None);
    assert_eq!(flow.graph.len(), 1);
    let starter = &flow.graph.nodes()[0];
    assert_eq!(starter.node_type(), NodeType::Message);
    assert_eq!(starter.position, Position::new(100.0, 100.0));
    assert!(session.notifications().is_empty());
}

#[test]
fn test_open_honors_config() {
    let config = EditorConfig {
        default_flow_name: "Untitled".to_string(),
        starter_node: false,
        ..EditorConfig::default()
    };
    let session = EditorSession::open(FlowStore::new(MemoryStore::new()), config);
    assert_eq!(session.flow().name, "Untitled");
    assert!(session.flow().graph.is_empty());
}

#[test]
fn test_open_restores_working_flow() {
    let mut store = FlowStore::new(MemoryStore::new());
    store.save_current(&create_full_flow()).unwrap();

    let session = EditorSession::open(store, EditorConfig::default());
    assert_eq!(*session.flow(), create_full_flow());
}

#[test]
fn test_open_falls_back_on_malformed_record() {
    let mut backend = MemoryStore::new();
    backend
        .set(CURRENT_FLOW_KEY, r#"{"nodes": [{"id": "a", "type": "hologram"}]}"#)
        .unwrap();

    let mut session = EditorSession::open(FlowStore::new(backend), EditorConfig::default());
    assert_eq!(session.flow().name, "New Agent Flow");
    assert_eq!(session.flow().graph.len(), 1);

    let notes = session.take_notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Warning);
    assert!(session.notifications().is_empty());
}

#[test]
fn test_open_with_storage_unavailable_reports_error() {
    let session = EditorSession::open(
        FlowStore::new(MemoryStore::disabled()),
        EditorConfig::default(),
    );
    assert_eq!(session.flow().graph.len(), 1);
    assert_eq!(session.notifications()[0].level, NotificationLevel::Error);
}

#[test]
fn test_add_node_stacks_below_previous() {
    let mut session = create_session();
    let second = session.add_node(NodeType::Input);
    let third = session.add_node(NodeType::Llm);

    let graph = &session.flow().graph;
    assert_eq!(graph.node(&second).unwrap().position, Position::new(100.0, 300.0));
    assert_eq!(graph.node(&third).unwrap().position, Position::new(100.0, 500.0));
}

#[test]
fn test_save_notifies_and_persists() {
    let mut session = create_session();
    session.rename("Support Bot");

    let summary = session.save().unwrap();
    assert_eq!(session.flow().id.as_deref(), Some(summary.id.as_str()));

    let notes = session.take_notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Info);
    assert_eq!(notes[0].title, "Flow Saved");
    assert_eq!(notes[0].description, "Support Bot has been saved successfully.");

    assert_eq!(
        session.store().load_current().unwrap().as_ref(),
        Some(session.flow())
    );
}

#[test]
fn test_save_with_blank_name_warns_and_writes_nothing() {
    let mut session = create_session();
    session.rename("   ");

    let err = session.save().unwrap_err();
    assert_eq!(err, EditorError::Validation(ValidationError::EmptyName));
    assert_eq!(session.notifications()[0].level, NotificationLevel::Warning);
    assert!(session.store().backend().is_empty());
    // The in-memory flow is untouched.
    assert_eq!(session.flow().name, "   ");
    assert_eq!(session.flow().graph.len(), 1);
}

#[test]
fn test_save_failure_keeps_in_memory_flow() {
    let mut session = EditorSession::open(
        FlowStore::new(MemoryStore::with_quota(64)),
        EditorConfig::default(),
    );
    session.add_node(NodeType::Webhook);
    let before = session.flow().clone();

    let err = session.save().unwrap_err();
    assert!(matches!(
        err,
        EditorError::Store(StoreError::Storage(StorageError::QuotaExceeded { .. }))
    ));
    assert_eq!(*session.flow(), before);
    assert_eq!(
        session.notifications().last().unwrap().level,
        NotificationLevel::Error
    );
}

#[test]
fn test_deploy_marks_flow_active() {
    let mut session = create_session();
    session.rename("Launch");

    let summary = session.deploy().unwrap();
    assert_eq!(summary.status, FlowStatus::Active);

    let listed = session.list_flows().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].status, FlowStatus::Active);

    let titles: Vec<&str> = session
        .notifications()
        .iter()
        .map(|n| n.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Flow Deployed"]);
    assert_eq!(
        session.notifications()[0].description,
        "Launch has been deployed and is now active."
    );

    // A later save keeps the deployed status.
    session.add_node(NodeType::Delay);
    assert_eq!(session.save().unwrap().status, FlowStatus::Active);
}

#[test]
fn test_connect_errors_become_warnings() {
    let mut session = create_session();
    let starter = session.flow().graph.nodes()[0].id.clone();

    let err = session.connect(&starter, &starter).unwrap_err();
    assert!(matches!(
        err,
        EditorError::InvalidOperation(GraphError::SelfConnection(_))
    ));
    assert_eq!(session.notifications()[0].level, NotificationLevel::Warning);
    assert!(connections_of(&session.flow().graph, &starter).is_empty());
}

#[test]
fn test_pointer_gestures_through_session() {
    let mut session = create_session();
    let first = session.flow().graph.nodes()[0].id.clone();
    let second = session.add_node(NodeType::Input);

    session.toggle_connection_mode();
    session.pointer_down(&first, Position::new(110.0, 110.0), PointerRegion::Header);
    session.click_node(&second);
    assert_eq!(connections_of(&session.flow().graph, &first), vec![second.as_str()]);

    // Second attempt at the same edge is rejected with a warning.
    session.click_node(&first);
    assert!(matches!(
        session.click_node(&second),
        InteractionOutcome::Rejected(_)
    ));
    assert_eq!(session.notifications().len(), 1);

    session.exit_connection_mode();
    session.pointer_down(&second, Position::new(100.0, 300.0), PointerRegion::Header);
    session.pointer_move(Position::new(-20.0, 40.0));
    session.pointer_up();
    assert_eq!(
        session.flow().graph.node(&second).unwrap().position,
        Position::new(-20.0, 40.0)
    );
}

#[test]
fn test_delete_open_flow_starts_blank_one() {
    let mut session = create_session();
    session.rename("Doomed");
    let id = session.save().unwrap().id;

    assert_eq!(session.delete_flow(&id), Ok(true));
    assert_eq!(session.flow().id, None);
    assert_eq!(session.flow().name, "New Agent Flow");
    assert!(session.list_flows().unwrap().is_empty());
    assert_eq!(session.store().load_flow(&id), Ok(None));
}

#[test]
fn test_open_flow_by_id() {
    let mut session = create_session();
    session.rename("First");
    let first_id = session.save().unwrap().id;

    session.new_flow();
    session.rename("Second");
    session.save().unwrap();

    session.open_flow(&first_id).unwrap();
    assert_eq!(session.flow().name, "First");

    assert_eq!(
        session.open_flow("flow-missing"),
        Err(EditorError::FlowNotFound("flow-missing".to_string()))
    );
    assert_eq!(session.flow().name, "First");
}

#[test]
fn test_new_from_template() {
    let mut session = create_session();
    session.new_from_template("template-1").unwrap();

    let flow = session.flow();
    assert_eq!(flow.name, "Customer Support Bot");
    assert_eq!(flow.id, None);
    assert_eq!(
        connections_of(&flow.graph, "condition_check"),
        vec!["booking_flow", "general_response"]
    );

    assert_eq!(
        session.new_from_template("template-99"),
        Err(EditorError::TemplateNotFound("template-99".to_string()))
    );
    assert_eq!(session.flow().name, "Customer Support Bot");
}

#[test]
fn test_import_replaces_flow_and_rejects_garbage() {
    let mut session = create_session();
    let text = serializer::to_json_string(&create_full_flow());

    session.import(&text).unwrap();
    assert_eq!(*session.flow(), create_full_flow());

    assert!(matches!(
        session.import("[]"),
        Err(EditorError::Malformed(MalformedFlowError::NotAnObject))
    ));
    assert_eq!(*session.flow(), create_full_flow());
}

#[test]
fn test_export_and_code_view() {
    let mut session = create_session();
    session.rename("My  Bot");

    let exported = session.export();
    assert_eq!(exported.file_name, "My_Bot.json");
    assert_eq!(exported.contents, session.code_view());
    assert!(exported.contents.contains('\n'));
    assert_eq!(
        serializer::from_json_str(&exported.contents).unwrap(),
        *session.flow()
    );

    let compact = EditorSession::open(
        FlowStore::new(MemoryStore::new()),
        EditorConfig {
            pretty_export: false,
            ..EditorConfig::default()
        },
    );
    assert!(!compact.export().contents.contains('\n'));
}

#[test]
fn test_autosave_writes_only_working_record() {
    let dir = tempfile::tempdir().unwrap();
    let store = FlowStore::new(FileStore::open(dir.path()).unwrap());
    let mut session = EditorSession::open(store, EditorConfig::default());
    session.add_node(NodeType::Condition);

    session.autosave().unwrap();
    assert_eq!(session.flow().id, None);
    assert!(session.list_flows().unwrap().is_empty());

    let reopened = EditorSession::open(
        FlowStore::new(FileStore::open(dir.path()).unwrap()),
        EditorConfig::default(),
    );
    assert_eq!(reopened.flow(), session.flow());
}

#[test]
fn test_failed_deploy_reports_one_error_and_writes_nothing() {
    let store = FlowStore::new(FailingStore::failing_on(CATALOG_KEY));
    let mut session = EditorSession::open(store, EditorConfig::default());
    session.rename("Launch");

    assert!(session.deploy().is_err());
    let notes = session.take_notifications();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].level, NotificationLevel::Error);
    assert_eq!(notes[0].title, "Deploy failed");
    assert_eq!(session.flow().id, None);
    assert!(session.store().backend().inner.is_empty());
}
