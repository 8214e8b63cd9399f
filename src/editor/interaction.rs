use crate::error::{EditorError, GraphError, ValidationError};
use crate::flow::{Flow, FlowStatus, FlowSummary, Node, Position};
use crate::graph::FlowGraph;
use crate::store::{FlowStore, KeyValueStore};
use chrono::Utc;

/// Connection-authoring state.
///
/// `Idle` means connection mode is off. `AwaitingTarget(None)` means the mode is on and no
/// source has been picked yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Idle,
    AwaitingTarget(Option<String>),
}

/// Node-dragging state. `offset` is the pointer position relative to the node's origin.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    NotDragging,
    Dragging { node_id: String, offset: Position },
}

/// Which part of a node the pointer went down on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerRegion {
    /// Title bar and frame; starts a drag.
    Header,
    /// The editable field area; never starts a drag.
    Content,
}

/// What a pointer event or click turned into.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionOutcome {
    /// Nothing changed.
    None,
    DragStarted { node_id: String },
    Moved { node_id: String, position: Position },
    DragEnded { node_id: String },
    SourceSelected { node_id: String },
    Connected { source_id: String, target_id: String },
    /// The gesture mapped to an invalid operation; the graph is unchanged.
    Rejected(GraphError),
}

/// Turns pointer gestures into `FlowGraph` operations.
///
/// Holds only transient UI state; the graph is passed into every call.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    connection: ConnectionState,
    drag: DragState,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connection_state(&self) -> &ConnectionState {
        &self.connection
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    pub fn is_connection_mode(&self) -> bool {
        matches!(self.connection, ConnectionState::AwaitingTarget(_))
    }

    /// Switches clicks to connection authoring. Ends any drag in progress.
    pub fn enter_connection_mode(&mut self) {
        self.drag = DragState::NotDragging;
        if !self.is_connection_mode() {
            self.connection = ConnectionState::AwaitingTarget(None);
        }
    }

    /// Leaves connection mode, discarding a half-picked source.
    pub fn exit_connection_mode(&mut self) {
        self.connection = ConnectionState::Idle;
    }

    pub fn toggle_connection_mode(&mut self) {
        if self.is_connection_mode() {
            self.exit_connection_mode();
        } else {
            self.enter_connection_mode();
        }
    }

    /// A click on a node. Only meaningful in connection mode.
    pub fn click_node(&mut self, graph: &mut FlowGraph, node_id: &str) -> InteractionOutcome {
        let source = match &self.connection {
            ConnectionState::AwaitingTarget(source) => source.clone(),
            ConnectionState::Idle => return InteractionOutcome::None,
        };
        if !graph.contains(node_id) {
            return InteractionOutcome::Rejected(GraphError::NodeNotFound(node_id.to_string()));
        }

        match source {
            None => {
                self.connection = ConnectionState::AwaitingTarget(Some(node_id.to_string()));
                InteractionOutcome::SourceSelected {
                    node_id: node_id.to_string(),
                }
            }
            Some(source_id) if source_id == node_id => InteractionOutcome::None,
            Some(source_id) => {
                self.connection = ConnectionState::AwaitingTarget(None);
                match graph.connect(&source_id, node_id) {
                    Ok(()) => InteractionOutcome::Connected {
                        source_id,
                        target_id: node_id.to_string(),
                    },
                    Err(err) => InteractionOutcome::Rejected(err),
                }
            }
        }
    }

    /// Pointer pressed on a node. In connection mode this is a connection click; otherwise
    /// a press on the header starts a drag.
    pub fn pointer_down(
        &mut self,
        graph: &mut FlowGraph,
        node_id: &str,
        pointer: Position,
        region: PointerRegion,
    ) -> InteractionOutcome {
        if self.is_connection_mode() {
            return self.click_node(graph, node_id);
        }
        if region == PointerRegion::Content || matches!(self.drag, DragState::Dragging { .. }) {
            return InteractionOutcome::None;
        }
        let Some(node) = graph.node(node_id) else {
            return InteractionOutcome::None;
        };

        self.drag = DragState::Dragging {
            node_id: node_id.to_string(),
            offset: pointer - node.position,
        };
        InteractionOutcome::DragStarted {
            node_id: node_id.to_string(),
        }
    }

    /// Pointer moved over the canvas. Moves the dragged node, keeping the grab offset.
    pub fn pointer_move(&mut self, graph: &mut FlowGraph, pointer: Position) -> InteractionOutcome {
        let (node_id, offset) = match &self.drag {
            DragState::Dragging { node_id, offset } => (node_id.clone(), *offset),
            DragState::NotDragging => return InteractionOutcome::None,
        };
        let position = pointer - offset;
        if graph.move_node(&node_id, position) {
            InteractionOutcome::Moved { node_id, position }
        } else {
            // The node went away mid-drag.
            self.drag = DragState::NotDragging;
            InteractionOutcome::None
        }
    }

    pub fn pointer_up(&mut self) -> InteractionOutcome {
        match std::mem::take(&mut self.drag) {
            DragState::Dragging { node_id, .. } => InteractionOutcome::DragEnded { node_id },
            DragState::NotDragging => InteractionOutcome::None,
        }
    }

    /// Pointer left the canvas; treated like a release.
    pub fn pointer_leave(&mut self) -> InteractionOutcome {
        self.pointer_up()
    }

    /// Deletes a node and drops any transient state that refers to it.
    pub fn delete_node(&mut self, graph: &mut FlowGraph, node_id: &str) -> Option<Node> {
        if matches!(&self.drag, DragState::Dragging { node_id: dragged, .. } if dragged == node_id)
        {
            self.drag = DragState::NotDragging;
        }
        if matches!(&self.connection, ConnectionState::AwaitingTarget(Some(source)) if source == node_id)
        {
            self.connection = ConnectionState::AwaitingTarget(None);
        }
        graph.delete_node(node_id)
    }

    /// Persists `flow` as the working flow and refreshes its catalog entry.
    ///
    /// The name is validated before anything is written. The flow gets its id and
    /// creation time on first save; they are only assigned once every write succeeded.
    pub fn save_flow<S: KeyValueStore>(
        &self,
        flow: &mut Flow,
        store: &mut FlowStore<S>,
    ) -> Result<FlowSummary, EditorError> {
        self.commit(flow, store, None)
    }

    /// Saves `flow` exactly like `save_flow` and marks its catalog entry active, in
    /// the same write.
    pub fn deploy_flow<S: KeyValueStore>(
        &self,
        flow: &mut Flow,
        store: &mut FlowStore<S>,
    ) -> Result<FlowSummary, EditorError> {
        self.commit(flow, store, Some(FlowStatus::Active))
    }

    fn commit<S: KeyValueStore>(
        &self,
        flow: &mut Flow,
        store: &mut FlowStore<S>,
        status: Option<FlowStatus>,
    ) -> Result<FlowSummary, EditorError> {
        if flow.name.trim().is_empty() {
            return Err(ValidationError::EmptyName.into());
        }

        let now = Utc::now();
        let mut snapshot = flow.clone();
        let id = snapshot.ensure_identity(now);

        let previous = store.list_summaries()?.into_iter().find(|s| s.id == id);
        let mut summary = snapshot
            .summary(FlowStatus::Draft)
            .ok_or_else(|| EditorError::FlowNotFound(id.clone()))?;
        if let Some(previous) = previous {
            summary.status = previous.status;
            summary.description = previous.description;
        }
        if let Some(status) = status {
            summary.status = status;
        }
        summary.last_modified = Some(now);

        store.save_all(&id, &snapshot, summary.clone())?;

        flow.id = snapshot.id;
        flow.created_at = snapshot.created_at;
        log::info!("Saved flow '{}' ({}, {})", flow.name, id, summary.status);
        Ok(summary)
    }
}
