//! Canonical JSON form of a flow, used for persistence, export/import and the code view.
//!
//! A flow document has exactly the shape
//! `{id, name, nodes: [{id, type, data, position: {x, y}, connections}], createdAt}`.
//! Reading is lenient about optional parts (`data` fields, `connections`, `position`,
//! `id`, `createdAt`) and strict about structure (`nodes` must be an array and every
//! node needs an `id` and a known `type`).

use crate::error::MalformedFlowError;
use crate::flow::{DEFAULT_FLOW_NAME, Flow, Node, NodeData, NodePatch, NodeType, Position};
use crate::graph::FlowGraph;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value, json};

/// Renders a flow as its canonical JSON document.
pub fn serialize(flow: &Flow) -> Value {
    let nodes: Vec<Value> = flow.graph.nodes().iter().map(serialize_node).collect();
    json!({
        "id": flow.id,
        "name": flow.name,
        "nodes": nodes,
        "createdAt": flow.created_at,
    })
}

fn serialize_node(node: &Node) -> Value {
    json!({
        "id": node.id,
        "type": node.node_type(),
        "data": node.data.to_patch(),
        "position": node.position,
        "connections": node.connections,
    })
}

/// Compact single-line JSON, as written to storage.
pub fn to_json_string(flow: &Flow) -> String {
    serialize(flow).to_string()
}

/// Indented JSON, as shown in the code view and written to export files.
pub fn to_pretty_string(flow: &Flow) -> String {
    format!("{:#}", serialize(flow))
}

/// Parses JSON text and rebuilds the flow it describes.
pub fn from_json_str(text: &str) -> Result<Flow, MalformedFlowError> {
    let doc: Value = serde_json::from_str(text)
        .map_err(|e| MalformedFlowError::JsonParseError(e.to_string()))?;
    deserialize(&doc)
}

/// Rebuilds a flow from its canonical JSON document.
pub fn deserialize(doc: &Value) -> Result<Flow, MalformedFlowError> {
    let obj = doc.as_object().ok_or(MalformedFlowError::NotAnObject)?;

    let entries = obj
        .get("nodes")
        .and_then(Value::as_array)
        .ok_or(MalformedFlowError::NodesNotSequence)?;

    let nodes = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| deserialize_node(index, entry))
        .collect::<Result<Vec<_>, _>>()?;

    let name = match obj.get("name") {
        None | Some(Value::Null) => DEFAULT_FLOW_NAME.to_string(),
        Some(Value::String(name)) => name.clone(),
        Some(other) => return Err(invalid_flow_field("name", other)),
    };

    let id = match obj.get("id") {
        None | Some(Value::Null) => None,
        Some(Value::String(id)) => Some(id.clone()),
        Some(other) => return Err(invalid_flow_field("id", other)),
    };

    let created_at = match obj.get("createdAt") {
        None | Some(Value::Null) => None,
        Some(value) => Some(
            serde_json::from_value::<DateTime<Utc>>(value.clone()).map_err(|e| {
                MalformedFlowError::InvalidFlowField {
                    field: "createdAt".to_string(),
                    message: e.to_string(),
                }
            })?,
        ),
    };

    Ok(Flow {
        id,
        name,
        graph: FlowGraph::from_nodes(nodes)?,
        created_at,
    })
}

fn invalid_flow_field(field: &str, found: &Value) -> MalformedFlowError {
    MalformedFlowError::InvalidFlowField {
        field: field.to_string(),
        message: format!("expected a string, found {}", found),
    }
}

fn deserialize_node(index: usize, entry: &Value) -> Result<Node, MalformedFlowError> {
    let obj = entry
        .as_object()
        .ok_or(MalformedFlowError::MissingNodeField { index, field: "id" })?;

    let id = required_str(obj, index, "id")?;
    let type_name = required_str(obj, index, "type")?;
    let node_type =
        NodeType::from_name(type_name).ok_or_else(|| MalformedFlowError::UnknownNodeType {
            node_id: id.to_string(),
            type_name: type_name.to_string(),
        })?;

    let patch: NodePatch = optional_field(obj, id, "data")?.unwrap_or_default();
    let position: Position = optional_field(obj, id, "position")?.unwrap_or_default();
    let connections: Vec<String> = optional_field(obj, id, "connections")?.unwrap_or_default();

    Ok(Node {
        id: id.to_string(),
        data: NodeData::from_patch(node_type, &patch),
        position,
        connections,
    })
}

fn required_str<'a>(
    obj: &'a Map<String, Value>,
    index: usize,
    field: &'static str,
) -> Result<&'a str, MalformedFlowError> {
    obj.get(field)
        .and_then(Value::as_str)
        .ok_or(MalformedFlowError::MissingNodeField { index, field })
}

/// Decodes an optional node field. Absent and `null` both mean "use the default".
fn optional_field<T: serde::de::DeserializeOwned>(
    obj: &Map<String, Value>,
    node_id: &str,
    field: &str,
) -> Result<Option<T>, MalformedFlowError> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.clone()).map(Some).map_err(|e| {
            MalformedFlowError::InvalidNodeField {
                node_id: node_id.to_string(),
                field: field.to_string(),
                message: e.to_string(),
            }
        }),
    }
}

/// Download name for an exported flow: whitespace runs become a single underscore.
pub fn export_file_name(flow: &Flow) -> String {
    let mut stem = String::with_capacity(flow.name.len());
    let mut in_whitespace = false;
    for c in flow.name.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                stem.push('_');
            }
            in_whitespace = true;
        } else {
            stem.push(c);
            in_whitespace = false;
        }
    }
    format!("{}.json", stem)
}
