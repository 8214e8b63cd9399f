//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the agentflow crate.
//! Import this module to get access to the core functionality without having to import
//! each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use agentflow::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let text = std::fs::read_to_string("path/to/flow.json")?;
//! let mut flow = serializer::from_json_str(&text)?;
//!
//! let id = flow.graph.add_node(NodeType::Delay, Position::new(100.0, 900.0)).id.clone();
//! flow.graph.update_node_data(&id, &NodePatch { delay: Some(5), ..Default::default() });
//!
//! println!("{}", serializer::to_pretty_string(&flow));
//! # Ok(())
//! # }
//! ```

// Graph model
pub use crate::flow::{
    Flow, FlowStatus, FlowSummary, IntoFlow, Node, NodeData, NodePatch, NodeType, Position,
};
pub use crate::graph::FlowGraph;

// Editing and persistence
pub use crate::config::EditorConfig;
pub use crate::editor::{
    ConnectionState, DragState, EditorSession, InteractionController, InteractionOutcome,
    Notification, NotificationLevel, PointerRegion,
};
pub use crate::serializer;
pub use crate::store::{FlowStore, KeyValueStore};

// Node schema
pub use crate::registry::{EditorKind, FieldDescriptor, fields_for};

// Error types
pub use crate::error::{
    EditorError, GraphError, MalformedFlowError, StorageError, StoreError, ValidationError,
};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
