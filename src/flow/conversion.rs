use super::definition::Flow;
use crate::error::MalformedFlowError;

/// A trait for foreign data models that can be turned into an editable `Flow`.
///
/// Template seeds implement this, and so can any importer for a third-party flow format.
/// The conversion is expected to produce a structurally valid graph: unique node ids and
/// no connections pointing at nodes that don't exist.
///
/// # Example
///
/// ```rust,no_run
/// use agentflow::error::MalformedFlowError;
/// use agentflow::flow::{Flow, IntoFlow, NodePatch, NodeType, Position};
///
/// struct Greeting {
///     text: String,
/// }
///
/// impl IntoFlow for Greeting {
///     fn into_flow(self) -> Result<Flow, MalformedFlowError> {
///         let mut flow = Flow::new("Greeter");
///         let id = flow.graph.add_node(NodeType::Message, Position::new(100.0, 100.0)).id.clone();
///         flow.graph.update_node_data(&id, &NodePatch::content(self.text));
///         Ok(flow)
///     }
/// }
/// ```
pub trait IntoFlow {
    /// Consumes the object and converts it into an unsaved flow.
    fn into_flow(self) -> Result<Flow, MalformedFlowError>;
}
