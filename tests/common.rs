//! Common test utilities for building flows and stores.
use agentflow::prelude::*;
use agentflow::error::StorageError;
use agentflow::store::MemoryStore;

/// Builds a node with fixed id, data and connections, bypassing `FlowGraph::add_node`.
#[allow(dead_code)]
pub fn node(id: &str, node_type: NodeType, x: f64, y: f64, connections: &[&str]) -> Node {
    let mut node = Node::new(id, node_type, Position::new(x, y));
    node.connections = connections.iter().map(|c| c.to_string()).collect();
    node
}

/// A → B, A → C, all message nodes.
#[allow(dead_code)]
pub fn create_fan_out_graph() -> FlowGraph {
    FlowGraph::from_nodes(vec![
        node("A", NodeType::Message, 100.0, 100.0, &["B", "C"]),
        node("B", NodeType::Message, 100.0, 300.0, &[]),
        node("C", NodeType::Message, 450.0, 300.0, &[]),
    ])
    .expect("fan-out graph is valid")
}

/// A saved-looking flow with every node type and populated data.
///
/// Logic: greet → ask → classify → branch → (lookup → notify → wait) | answer
#[allow(dead_code)]
pub fn create_full_flow() -> Flow {
    let mut nodes = vec![
        node("greet", NodeType::Message, 100.0, 100.0, &["ask"]),
        node("ask", NodeType::Input, 100.0, 300.0, &["classify"]),
        node("classify", NodeType::Llm, 100.0, 500.0, &["branch"]),
        node("branch", NodeType::Condition, 100.0, 700.0, &["lookup", "answer"]),
        node("lookup", NodeType::Api, -50.0, 900.0, &["notify"]),
        node("notify", NodeType::Webhook, -50.0, 1100.0, &["wait"]),
        node("wait", NodeType::Delay, -50.0, 1300.0, &[]),
        node("answer", NodeType::Message, 450.0, 900.5, &[]),
    ];
    let patches = [
        NodePatch::content("Hi there!"),
        NodePatch {
            variable: Some("user_query".to_string()),
            content: Some("What do you need?".to_string()),
            ..Default::default()
        },
        NodePatch {
            model: Some("gpt-4o".to_string()),
            prompt: Some("Classify: {{user_query}}".to_string()),
            ..Default::default()
        },
        NodePatch {
            condition: Some("intent == 'lookup'".to_string()),
            ..Default::default()
        },
        NodePatch {
            endpoint: Some("https://api.example.com/orders".to_string()),
            method: Some("POST".to_string()),
            ..Default::default()
        },
        NodePatch {
            webhook_url: Some("https://hooks.example.com/notify".to_string()),
            body: Some("{\"q\": \"{{user_query}}\"}".to_string()),
            ..Default::default()
        },
        NodePatch {
            delay: Some(3),
            ..Default::default()
        },
        NodePatch::content("Happy to help."),
    ];
    for (node, patch) in nodes.iter_mut().zip(patches.iter()) {
        node.data.apply(patch);
    }

    Flow {
        id: Some("flow-fixture".to_string()),
        name: "Order Helper".to_string(),
        graph: FlowGraph::from_nodes(nodes).expect("full flow is valid"),
        created_at: Some(
            "2024-05-01T12:30:00Z"
                .parse()
                .expect("fixture timestamp parses"),
        ),
    }
}

/// A session over an empty in-memory store with default settings.
#[allow(dead_code)]
pub fn create_session() -> EditorSession<MemoryStore> {
    EditorSession::open(FlowStore::new(MemoryStore::new()), EditorConfig::default())
}

/// Connection targets of `id`, for concise assertions.
#[allow(dead_code)]
pub fn connections_of<'a>(graph: &'a FlowGraph, id: &str) -> Vec<&'a str> {
    graph
        .node(id)
        .map(|n| n.connections.iter().map(String::as_str).collect())
        .unwrap_or_default()
}

/// In-memory backend whose writes to one chosen key fail.
#[allow(dead_code)]
#[derive(Debug, Clone, Default)]
pub struct FailingStore {
    pub inner: MemoryStore,
    pub fail_key: Option<&'static str>,
}

#[allow(dead_code)]
impl FailingStore {
    pub fn failing_on(key: &'static str) -> Self {
        Self {
            inner: MemoryStore::new(),
            fail_key: Some(key),
        }
    }
}

impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), StorageError> {
        if self.fail_key == Some(key) {
            return Err(StorageError::Unavailable(format!("write to '{}' refused", key)));
        }
        self.inner.set(key, value)
    }

    fn remove(&mut self, key: &str) -> std::result::Result<(), StorageError> {
        self.inner.remove(key)
    }
}
