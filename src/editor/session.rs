use super::interaction::{InteractionController, InteractionOutcome, PointerRegion};
use crate::config::EditorConfig;
use crate::error::{EditorError, StoreError};
use crate::flow::{Flow, FlowSummary, NodePatch, NodeType, Position};
use crate::graph::ORIGIN;
use crate::serializer;
use crate::store::{FlowStore, KeyValueStore};
use crate::template;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// A transient, user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: String,
}

impl Notification {
    fn new(
        level: NotificationLevel,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            level,
            title: title.into(),
            description: description.into(),
        }
    }
}

/// A flow rendered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFlow {
    pub file_name: String,
    pub contents: String,
}

/// One editor window: the working flow, its interaction state, and the store it saves to.
///
/// Every error is recoverable. Failures are returned to the caller and also queued as
/// notifications; the in-memory flow is never discarded because persistence failed.
#[derive(Debug)]
pub struct EditorSession<S: KeyValueStore> {
    flow: Flow,
    controller: InteractionController,
    store: FlowStore<S>,
    config: EditorConfig,
    notifications: Vec<Notification>,
}

impl<S: KeyValueStore> EditorSession<S> {
    /// Opens the editor on the stored working flow, or on a fresh flow if there is none
    /// or it cannot be read.
    pub fn open(store: FlowStore<S>, config: EditorConfig) -> Self {
        let mut session = Self {
            flow: Flow::new(config.default_flow_name.clone()),
            controller: InteractionController::new(),
            store,
            config,
            notifications: Vec::new(),
        };

        match session.store.load_current() {
            Ok(Some(flow)) => session.flow = flow,
            Ok(None) => session.flow = session.blank_flow(),
            Err(StoreError::Malformed { key, source }) => {
                log::warn!("Discarding unreadable working flow '{}': {}", key, source);
                session.flow = session.blank_flow();
                session.notify(
                    NotificationLevel::Warning,
                    "Could not load flow",
                    format!(
                        "The saved flow is corrupt and was replaced with a new one: {}",
                        source
                    ),
                );
            }
            Err(err @ StoreError::Storage(_)) => {
                log::warn!("Storage unavailable while opening editor: {}", err);
                session.flow = session.blank_flow();
                session.notify(NotificationLevel::Error, "Storage unavailable", err.to_string());
            }
        }
        session
    }

    fn blank_flow(&self) -> Flow {
        let mut flow = Flow::new(self.config.default_flow_name.clone());
        if self.config.starter_node {
            flow.graph.add_node(NodeType::Message, ORIGIN);
        }
        flow
    }

    fn notify(&mut self, level: NotificationLevel, title: &str, description: impl Into<String>) {
        self.notifications
            .push(Notification::new(level, title, description));
    }

    /// Queues an error notification and hands the error back.
    fn report<T>(&mut self, title: &str, err: impl Into<EditorError>) -> Result<T, EditorError> {
        let err = err.into();
        let level = match &err {
            EditorError::Validation(_) | EditorError::InvalidOperation(_) => {
                NotificationLevel::Warning
            }
            _ => NotificationLevel::Error,
        };
        self.notify(level, title, err.to_string());
        Err(err)
    }

    pub fn flow(&self) -> &Flow {
        &self.flow
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn store(&self) -> &FlowStore<S> {
        &self.store
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    fn replace_flow(&mut self, flow: Flow) {
        self.flow = flow;
        self.controller = InteractionController::new();
    }

    /// Discards the working flow in memory and starts a blank one.
    pub fn new_flow(&mut self) {
        let flow = self.blank_flow();
        self.replace_flow(flow);
    }

    /// Starts a new, unsaved flow from a catalog template.
    pub fn new_from_template(&mut self, template_id: &str) -> Result<(), EditorError> {
        let Some(found) = template::find_template(template_id) else {
            return self.report(
                "Template not found",
                EditorError::TemplateNotFound(template_id.to_string()),
            );
        };
        match found.instantiate() {
            Ok(flow) => {
                self.replace_flow(flow);
                Ok(())
            }
            Err(err) => self.report("Template is invalid", err),
        }
    }

    /// Opens a previously saved flow by id.
    pub fn open_flow(&mut self, id: &str) -> Result<(), EditorError> {
        match self.store.load_flow(id) {
            Ok(Some(flow)) => {
                self.replace_flow(flow);
                Ok(())
            }
            Ok(None) => self.report("Flow not found", EditorError::FlowNotFound(id.to_string())),
            Err(err) => self.report("Could not load flow", err),
        }
    }

    /// Replaces the working flow with an imported document.
    pub fn import(&mut self, text: &str) -> Result<(), EditorError> {
        match serializer::from_json_str(text) {
            Ok(flow) => {
                self.replace_flow(flow);
                Ok(())
            }
            Err(err) => self.report("Import failed", err),
        }
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.flow.name = name.into();
    }

    /// Adds a node below the last one, as the palette buttons do. Returns its id.
    pub fn add_node(&mut self, node_type: NodeType) -> String {
        let position = self.flow.graph.next_position(self.config.node_spacing);
        self.add_node_at(node_type, position)
    }

    pub fn add_node_at(&mut self, node_type: NodeType, position: Position) -> String {
        self.flow.graph.add_node(node_type, position).id.clone()
    }

    pub fn update_node(&mut self, id: &str, patch: &NodePatch) -> bool {
        self.flow.graph.update_node_data(id, patch)
    }

    pub fn move_node(&mut self, id: &str, position: Position) -> bool {
        self.flow.graph.move_node(id, position)
    }

    pub fn delete_node(&mut self, id: &str) -> bool {
        self.controller.delete_node(&mut self.flow.graph, id).is_some()
    }

    pub fn connect(&mut self, source_id: &str, target_id: &str) -> Result<(), EditorError> {
        match self.flow.graph.connect(source_id, target_id) {
            Ok(()) => Ok(()),
            Err(err) => self.report("Cannot connect nodes", err),
        }
    }

    pub fn disconnect(&mut self, source_id: &str, target_id: &str) -> Result<(), EditorError> {
        match self.flow.graph.disconnect(source_id, target_id) {
            Ok(()) => Ok(()),
            Err(err) => self.report("Cannot remove connection", err),
        }
    }

    pub fn toggle_connection_mode(&mut self) {
        self.controller.toggle_connection_mode();
    }

    pub fn exit_connection_mode(&mut self) {
        self.controller.exit_connection_mode();
    }

    fn surface(&mut self, outcome: InteractionOutcome) -> InteractionOutcome {
        if let InteractionOutcome::Rejected(err) = &outcome {
            self.notify(NotificationLevel::Warning, "Cannot connect nodes", err.to_string());
        }
        outcome
    }

    pub fn click_node(&mut self, node_id: &str) -> InteractionOutcome {
        let outcome = self.controller.click_node(&mut self.flow.graph, node_id);
        self.surface(outcome)
    }

    pub fn pointer_down(
        &mut self,
        node_id: &str,
        pointer: Position,
        region: PointerRegion,
    ) -> InteractionOutcome {
        let outcome = self
            .controller
            .pointer_down(&mut self.flow.graph, node_id, pointer, region);
        self.surface(outcome)
    }

    pub fn pointer_move(&mut self, pointer: Position) -> InteractionOutcome {
        self.controller.pointer_move(&mut self.flow.graph, pointer)
    }

    pub fn pointer_up(&mut self) -> InteractionOutcome {
        self.controller.pointer_up()
    }

    pub fn pointer_leave(&mut self) -> InteractionOutcome {
        self.controller.pointer_leave()
    }

    /// Saves the working flow and its catalog entry.
    pub fn save(&mut self) -> Result<FlowSummary, EditorError> {
        match self.controller.save_flow(&mut self.flow, &mut self.store) {
            Ok(summary) => {
                let description = format!("{} has been saved successfully.", self.flow.name);
                self.notify(NotificationLevel::Info, "Flow Saved", description);
                Ok(summary)
            }
            Err(err) => self.report("Save failed", err),
        }
    }

    /// Writes the working record only, without assigning an identity or touching the catalog.
    pub fn autosave(&mut self) -> Result<(), EditorError> {
        match self.store.save_current(&self.flow) {
            Ok(()) => Ok(()),
            Err(err) => self.report("Autosave failed", err),
        }
    }

    /// Saves the flow and marks it active in the catalog.
    pub fn deploy(&mut self) -> Result<FlowSummary, EditorError> {
        match self.controller.deploy_flow(&mut self.flow, &mut self.store) {
            Ok(summary) => {
                let description =
                    format!("{} has been deployed and is now active.", self.flow.name);
                self.notify(NotificationLevel::Info, "Flow Deployed", description);
                Ok(summary)
            }
            Err(err) => self.report("Deploy failed", err),
        }
    }

    /// Every saved flow in the catalog.
    pub fn list_flows(&mut self) -> Result<Vec<FlowSummary>, EditorError> {
        match self.store.list_summaries() {
            Ok(summaries) => Ok(summaries),
            Err(err) => self.report("Could not list flows", err),
        }
    }

    /// Deletes a saved flow and its catalog entry. If it is the open flow, a blank flow
    /// takes its place.
    pub fn delete_flow(&mut self, id: &str) -> Result<bool, EditorError> {
        match self.store.delete_flow(id) {
            Ok(removed) => {
                if self.flow.id.as_deref() == Some(id) {
                    self.new_flow();
                }
                Ok(removed)
            }
            Err(err) => self.report("Delete failed", err),
        }
    }

    /// The JSON document shown in the code view.
    pub fn code_view(&self) -> String {
        serializer::to_pretty_string(&self.flow)
    }

    /// The working flow as a downloadable document.
    pub fn export(&self) -> ExportedFlow {
        let contents = if self.config.pretty_export {
            serializer::to_pretty_string(&self.flow)
        } else {
            serializer::to_json_string(&self.flow)
        };
        ExportedFlow {
            file_name: serializer::export_file_name(&self.flow),
            contents,
        }
    }
}
