use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

/// The kind of behavior a node represents. Determines which data fields are meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Message,
    Input,
    Condition,
    Api,
    Llm,
    Webhook,
    Delay,
}

impl NodeType {
    /// All node types, in palette order.
    pub const ALL: [NodeType; 7] = [
        NodeType::Message,
        NodeType::Input,
        NodeType::Condition,
        NodeType::Api,
        NodeType::Llm,
        NodeType::Webhook,
        NodeType::Delay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Message => "message",
            NodeType::Input => "input",
            NodeType::Condition => "condition",
            NodeType::Api => "api",
            NodeType::Llm => "llm",
            NodeType::Webhook => "webhook",
            NodeType::Delay => "delay",
        }
    }

    /// Looks up a node type by its wire name. Returns `None` for unrecognized names.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("unknown node type '{}'", s))
    }
}

/// Canvas coordinates. Unbounded in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A loose bag of node fields, keyed by their wire names.
///
/// Used both as the partial update passed to `FlowGraph::update_node_data` and as the
/// `data` object of a serialized node. Fields that don't apply to a node's type are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<u64>,
}

impl NodePatch {
    pub fn content(value: impl Into<String>) -> Self {
        Self {
            content: Some(value.into()),
            ..Default::default()
        }
    }

    /// Builds a single-field patch from a wire key and its textual value.
    pub fn from_pair(key: &str, value: &str) -> Result<Self, String> {
        let mut patch = Self::default();
        let text = Some(value.to_string());
        match key {
            "content" => patch.content = text,
            "variable" => patch.variable = text,
            "condition" => patch.condition = text,
            "endpoint" => patch.endpoint = text,
            "method" => patch.method = text,
            "model" => patch.model = text,
            "prompt" => patch.prompt = text,
            "webhookUrl" => patch.webhook_url = text,
            "body" => patch.body = text,
            "delay" => {
                let secs = value
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| format!("delay must be a non-negative integer, got '{}'", value))?;
                patch.delay = Some(secs);
            }
            other => return Err(format!("unknown field '{}'", other)),
        }
        Ok(patch)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Per-node payload. Each variant carries only the fields relevant to its node type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Message {
        content: Option<String>,
    },
    Input {
        variable: Option<String>,
        content: Option<String>,
    },
    Condition {
        condition: Option<String>,
    },
    Api {
        endpoint: Option<String>,
        method: Option<String>,
    },
    Llm {
        model: Option<String>,
        prompt: Option<String>,
    },
    Webhook {
        webhook_url: Option<String>,
        body: Option<String>,
    },
    Delay {
        delay: Option<u64>,
    },
}

/// Overwrites `slot` when the patch carries a value. Returns whether anything was applied.
fn merge<T: Clone>(slot: &mut Option<T>, incoming: &Option<T>) -> bool {
    match incoming {
        Some(value) => {
            *slot = Some(value.clone());
            true
        }
        None => false,
    }
}

impl NodeData {
    /// Data with every field unset.
    pub fn empty(node_type: NodeType) -> Self {
        Self::from_patch(node_type, &NodePatch::default())
    }

    pub fn node_type(&self) -> NodeType {
        match self {
            NodeData::Message { .. } => NodeType::Message,
            NodeData::Input { .. } => NodeType::Input,
            NodeData::Condition { .. } => NodeType::Condition,
            NodeData::Api { .. } => NodeType::Api,
            NodeData::Llm { .. } => NodeType::Llm,
            NodeData::Webhook { .. } => NodeType::Webhook,
            NodeData::Delay { .. } => NodeType::Delay,
        }
    }

    /// Picks the fields relevant to `node_type` out of a loose field bag.
    pub fn from_patch(node_type: NodeType, patch: &NodePatch) -> Self {
        match node_type {
            NodeType::Message => NodeData::Message {
                content: patch.content.clone(),
            },
            NodeType::Input => NodeData::Input {
                variable: patch.variable.clone(),
                content: patch.content.clone(),
            },
            NodeType::Condition => NodeData::Condition {
                condition: patch.condition.clone(),
            },
            NodeType::Api => NodeData::Api {
                endpoint: patch.endpoint.clone(),
                method: patch.method.clone(),
            },
            NodeType::Llm => NodeData::Llm {
                model: patch.model.clone(),
                prompt: patch.prompt.clone(),
            },
            NodeType::Webhook => NodeData::Webhook {
                webhook_url: patch.webhook_url.clone(),
                body: patch.body.clone(),
            },
            NodeType::Delay => NodeData::Delay { delay: patch.delay },
        }
    }

    /// Flattens the variant back into a field bag, omitting unset fields.
    pub fn to_patch(&self) -> NodePatch {
        let mut patch = NodePatch::default();
        match self {
            NodeData::Message { content } => patch.content = content.clone(),
            NodeData::Input { variable, content } => {
                patch.variable = variable.clone();
                patch.content = content.clone();
            }
            NodeData::Condition { condition } => patch.condition = condition.clone(),
            NodeData::Api { endpoint, method } => {
                patch.endpoint = endpoint.clone();
                patch.method = method.clone();
            }
            NodeData::Llm { model, prompt } => {
                patch.model = model.clone();
                patch.prompt = prompt.clone();
            }
            NodeData::Webhook { webhook_url, body } => {
                patch.webhook_url = webhook_url.clone();
                patch.body = body.clone();
            }
            NodeData::Delay { delay } => patch.delay = *delay,
        }
        patch
    }

    /// Shallow-merges a patch. Fields absent from the patch, or irrelevant to this
    /// node type, are left untouched. Returns the number of fields written.
    pub fn apply(&mut self, patch: &NodePatch) -> usize {
        let written = match self {
            NodeData::Message { content } => vec![merge(content, &patch.content)],
            NodeData::Input { variable, content } => {
                vec![merge(variable, &patch.variable), merge(content, &patch.content)]
            }
            NodeData::Condition { condition } => vec![merge(condition, &patch.condition)],
            NodeData::Api { endpoint, method } => {
                vec![merge(endpoint, &patch.endpoint), merge(method, &patch.method)]
            }
            NodeData::Llm { model, prompt } => {
                vec![merge(model, &patch.model), merge(prompt, &patch.prompt)]
            }
            NodeData::Webhook { webhook_url, body } => {
                vec![merge(webhook_url, &patch.webhook_url), merge(body, &patch.body)]
            }
            NodeData::Delay { delay } => vec![merge(delay, &patch.delay)],
        };
        written.into_iter().filter(|w| *w).count()
    }

    /// Reads a field by its wire key, rendered as text. `None` when unset or not
    /// meaningful for this node type.
    pub fn get(&self, key: &str) -> Option<String> {
        let patch = self.to_patch();
        match key {
            "content" => patch.content,
            "variable" => patch.variable,
            "condition" => patch.condition,
            "endpoint" => patch.endpoint,
            "method" => patch.method,
            "model" => patch.model,
            "prompt" => patch.prompt,
            "webhookUrl" => patch.webhook_url,
            "body" => patch.body,
            "delay" => patch.delay.map(|d| d.to_string()),
            _ => None,
        }
    }
}

/// A typed unit of behavior placed on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub data: NodeData,
    pub position: Position,
    /// Outgoing edges, in the order they were authored.
    pub connections: Vec<String>,
}

impl Node {
    pub fn new(id: impl Into<String>, node_type: NodeType, position: Position) -> Self {
        Self {
            id: id.into(),
            data: NodeData::empty(node_type),
            position,
            connections: Vec::new(),
        }
    }

    pub fn node_type(&self) -> NodeType {
        self.data.node_type()
    }

    pub fn is_connected_to(&self, target_id: &str) -> bool {
        self.connections.iter().any(|c| c == target_id)
    }
}
