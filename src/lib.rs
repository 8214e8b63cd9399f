//! # agentflow - Flow Graph Model for Visual Agent Editors
//!
//! **agentflow** is the design-time core of a visual editor for conversational-agent
//! workflows. Users place typed nodes (message, input, condition, API call, LLM call,
//! webhook, delay) on a canvas, drag them around, wire directed connections between them,
//! edit per-node fields, and save the result as a named "flow."
//!
//! ## Core Workflow
//!
//! The crate is rendering-agnostic. A UI layer feeds it discrete user events and reads
//! back the graph:
//!
//! 1.  **Open a Session**: Create an `EditorSession` over a `FlowStore`. It restores the working flow, or starts a new one.
//! 2.  **Edit**: Add, move, update, connect and delete nodes through `FlowGraph` operations, directly or via pointer gestures routed through the `InteractionController`.
//! 3.  **Persist**: Save the flow. The working record and its catalog entry (`FlowSummary`) are written together.
//! 4.  **Export**: Render the canonical JSON document for the code view or a download.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use agentflow::prelude::*;
//! use agentflow::store::MemoryStore;
//!
//! fn main() -> Result<()> {
//!     let store = FlowStore::new(MemoryStore::new());
//!     let mut session = EditorSession::open(store, EditorConfig::default());
//!
//!     // A blank flow starts with one message node; add an input below it.
//!     let greeting = session.flow().graph.nodes()[0].id.clone();
//!     session.update_node(&greeting, &NodePatch::content("Hello! How can I assist you today?"));
//!     let question = session.add_node(NodeType::Input);
//!     session.connect(&greeting, &question)?;
//!
//!     session.rename("Support Bot");
//!     let summary = session.save()?;
//!     println!("Saved '{}' as {}", summary.name, summary.id);
//!
//!     println!("{}", session.code_view());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod editor;
pub mod error;
pub mod flow;
pub mod graph;
pub mod prelude;
pub mod registry;
pub mod serializer;
pub mod store;
pub mod template;
