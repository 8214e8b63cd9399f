//! The authoritative, mutable node/connection model of a single flow.
//!
//! Every mutation goes through a `FlowGraph` method and leaves the graph structurally
//! valid: node ids are unique, there are no self-loops, no duplicate edges, and no
//! connection refers to a node that is not in the graph.

use crate::error::{GraphError, MalformedFlowError};
use crate::flow::{Node, NodePatch, NodeType, Position};
use ahash::AHashSet;
use itertools::Itertools;
use std::collections::VecDeque;

/// Where the first node of an empty graph is placed.
pub const ORIGIN: Position = Position { x: 100.0, y: 100.0 };

/// Vertical gap used when stacking a new node below the last one.
pub const DEFAULT_NODE_SPACING: f64 = 200.0;

/// An ordered set of nodes and the directed connections between them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlowGraph {
    nodes: Vec<Node>,
}

impl FlowGraph {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Builds a graph from nodes read out of a document.
    ///
    /// Duplicate node ids are rejected. Self-loops, repeated edges and edges to nodes that
    /// are not part of the document are dropped so the resulting graph is valid.
    pub fn from_nodes(mut nodes: Vec<Node>) -> Result<Self, MalformedFlowError> {
        let mut ids = AHashSet::with_capacity(nodes.len());
        for node in &nodes {
            if !ids.insert(node.id.clone()) {
                return Err(MalformedFlowError::InvalidFlowField {
                    field: "nodes".to_string(),
                    message: format!("duplicate node id '{}'", node.id),
                });
            }
        }

        for node in &mut nodes {
            let before = node.connections.len();
            let own_id = node.id.clone();
            node.connections = std::mem::take(&mut node.connections)
                .into_iter()
                .filter(|target| *target != own_id && ids.contains(target))
                .unique()
                .collect();
            let pruned = before - node.connections.len();
            if pruned > 0 {
                log::warn!(
                    "Dropped {} invalid connection(s) from node '{}' while loading",
                    pruned,
                    node.id
                );
            }
        }

        Ok(Self { nodes })
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index_of(id).is_some()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == id)
    }

    fn fresh_id(&self) -> String {
        loop {
            let candidate = format!("node_{}", uuid::Uuid::new_v4().simple());
            if !self.contains(&candidate) {
                return candidate;
            }
        }
    }

    /// Creates a node with a fresh id, empty data and no connections.
    pub fn add_node(&mut self, node_type: NodeType, position: Position) -> &Node {
        let node = Node::new(self.fresh_id(), node_type, position);
        log::debug!("Added {} node '{}' at ({}, {})", node_type, node.id, position.x, position.y);
        self.nodes.push(node);
        &self.nodes[self.nodes.len() - 1]
    }

    /// Placement for a node added from the palette: stacked `spacing` below the last node,
    /// or at `ORIGIN` when the graph is empty.
    pub fn next_position(&self, spacing: f64) -> Position {
        match self.nodes.last() {
            Some(last) => Position::new(ORIGIN.x, last.position.y + spacing),
            None => ORIGIN,
        }
    }

    /// Shallow-merges `patch` into the node's data. Unknown ids are ignored.
    /// Returns whether the node exists.
    pub fn update_node_data(&mut self, id: &str, patch: &NodePatch) -> bool {
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                let written = node.data.apply(patch);
                log::debug!("Updated {} field(s) on node '{}'", written, id);
                true
            }
            None => {
                log::debug!("Ignoring data update for unknown node '{}'", id);
                false
            }
        }
    }

    /// Overwrites the node's position without clamping. Unknown ids are ignored.
    pub fn move_node(&mut self, id: &str, position: Position) -> bool {
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => {
                log::debug!("Ignoring move for unknown node '{}'", id);
                false
            }
        }
    }

    /// Removes the node and every connection that points at it.
    pub fn delete_node(&mut self, id: &str) -> Option<Node> {
        let index = self.index_of(id)?;
        self.disconnect_all(id);
        let removed = self.nodes.remove(index);
        log::debug!("Deleted node '{}'", id);
        Some(removed)
    }

    /// Appends `target_id` to the source's connections.
    ///
    /// Rejects unknown ids, self-loops and duplicate edges; the graph is unchanged on error.
    pub fn connect(&mut self, source_id: &str, target_id: &str) -> Result<(), GraphError> {
        if !self.contains(target_id) {
            return Err(GraphError::NodeNotFound(target_id.to_string()));
        }
        let source = self
            .nodes
            .iter_mut()
            .find(|n| n.id == source_id)
            .ok_or_else(|| GraphError::NodeNotFound(source_id.to_string()))?;

        if source_id == target_id {
            return Err(GraphError::SelfConnection(source_id.to_string()));
        }
        if source.is_connected_to(target_id) {
            return Err(GraphError::DuplicateConnection {
                source_id: source_id.to_string(),
                target_id: target_id.to_string(),
            });
        }

        source.connections.push(target_id.to_string());
        log::debug!("Connected '{}' -> '{}'", source_id, target_id);
        Ok(())
    }

    /// Removes a single edge.
    pub fn disconnect(&mut self, source_id: &str, target_id: &str) -> Result<(), GraphError> {
        let source = self
            .nodes
            .iter_mut()
            .find(|n| n.id == source_id)
            .ok_or_else(|| GraphError::NodeNotFound(source_id.to_string()))?;

        let before = source.connections.len();
        source.connections.retain(|c| c != target_id);
        if source.connections.len() == before {
            return Err(GraphError::ConnectionNotFound {
                source_id: source_id.to_string(),
                target_id: target_id.to_string(),
            });
        }
        Ok(())
    }

    /// Removes every edge touching `id`, incoming and outgoing. Returns how many were removed.
    pub fn disconnect_all(&mut self, id: &str) -> usize {
        let mut removed = 0;
        for node in &mut self.nodes {
            let before = node.connections.len();
            if node.id == id {
                node.connections.clear();
            } else {
                node.connections.retain(|c| c != id);
            }
            removed += before - node.connections.len();
        }
        removed
    }

    /// Ids of nodes with an edge into `id`, in insertion order.
    pub fn incoming(&self, id: &str) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|n| n.is_connected_to(id))
            .map(|n| n.id.as_str())
            .collect()
    }

    /// Nodes with no incoming edge. Execution starts from these.
    pub fn roots(&self) -> Vec<&Node> {
        let targets: AHashSet<&str> = self
            .nodes
            .iter()
            .flat_map(|n| n.connections.iter().map(String::as_str))
            .collect();
        self.nodes
            .iter()
            .filter(|n| !targets.contains(n.id.as_str()))
            .collect()
    }

    /// Breadth-first order from each root in turn. Nodes only reachable through a cycle are
    /// visited afterwards in insertion order, so every node appears exactly once.
    pub fn traversal_order(&self) -> Vec<&str> {
        let mut seen: AHashSet<&str> = AHashSet::with_capacity(self.nodes.len());
        let mut order = Vec::with_capacity(self.nodes.len());
        let starts = self
            .roots()
            .into_iter()
            .chain(self.nodes.iter())
            .map(|n| n.id.as_str());

        for start in starts {
            if seen.contains(start) {
                continue;
            }
            let mut queue = VecDeque::from([start]);
            while let Some(id) = queue.pop_front() {
                if !seen.insert(id) {
                    continue;
                }
                order.push(id);
                if let Some(node) = self.node(id) {
                    queue.extend(node.connections.iter().map(String::as_str));
                }
            }
        }
        order
    }
}
