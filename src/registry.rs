use crate::flow::{Node, NodeType};

/// Models offered by the LLM node's model picker.
pub const LLM_MODELS: &[&str] = &["gpt-3.5-turbo", "gpt-4o", "claude-3-5-sonnet", "mistral-large"];

/// HTTP verbs offered by the API node.
pub const HTTP_METHODS: &[&str] = &["GET", "POST", "PUT", "PATCH", "DELETE"];

/// How a field is edited on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKind {
    /// Single-line text input.
    Text,
    /// Multi-line text area.
    TextArea,
    /// Pick one of a fixed set of values.
    Select(&'static [&'static str]),
    /// Non-negative integer input.
    Number,
}

/// Describes one editable field of a node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Wire key inside the node's `data` object.
    pub key: &'static str,
    pub label: &'static str,
    pub editor: EditorKind,
    pub placeholder: &'static str,
    /// Value shown when the node has nothing stored for this field.
    pub default: Option<&'static str>,
}

/// Defines the field schema of every node type and the lookup over it.
macro_rules! define_node_fields {
    ( $( $node_type:path => [ $( ($key:expr, $label:expr, $editor:expr, $placeholder:expr, $default:expr) ),* $(,)? ] ),* $(,)? ) => {
        /// Ordered field descriptors for a node type.
        pub fn fields_for(node_type: NodeType) -> &'static [FieldDescriptor] {
            match node_type {
                $(
                    $node_type => &[
                        $( FieldDescriptor {
                            key: $key,
                            label: $label,
                            editor: $editor,
                            placeholder: $placeholder,
                            default: $default,
                        } ),*
                    ],
                )*
            }
        }
    };
}

define_node_fields! {
    NodeType::Message => [
        ("content", "Message", EditorKind::TextArea, "Message to send to the user", None),
    ],
    NodeType::Input => [
        ("variable", "Input Variable", EditorKind::Text, "Variable name", None),
        ("content", "Prompt", EditorKind::Text, "Prompt for input", None),
    ],
    NodeType::Condition => [
        ("condition", "Condition", EditorKind::TextArea, "if variable == 'value'", None),
    ],
    NodeType::Api => [
        ("endpoint", "API Endpoint", EditorKind::Text, "https://api.example.com/endpoint", None),
        ("method", "Method", EditorKind::Select(HTTP_METHODS), "Select Method", Some("GET")),
    ],
    NodeType::Llm => [
        ("model", "LLM Model", EditorKind::Select(LLM_MODELS), "Select Model", Some("gpt-3.5-turbo")),
        ("prompt", "Prompt", EditorKind::TextArea, "Enter your prompt here...", None),
    ],
    NodeType::Webhook => [
        ("webhookUrl", "Webhook URL", EditorKind::Text, "https://hooks.example.com/notify", None),
        ("body", "Payload", EditorKind::TextArea, "{\"message\": \"{{variable}}\"}", None),
    ],
    NodeType::Delay => [
        ("delay", "Delay (seconds)", EditorKind::Number, "Seconds to wait", Some("0")),
    ],
}

/// Field descriptors looked up by wire type name. Unrecognized names yield no fields.
pub fn fields_for_name(type_name: &str) -> &'static [FieldDescriptor] {
    NodeType::from_name(type_name).map(fields_for).unwrap_or(&[])
}

/// Looks up a single field of a node type.
pub fn field(node_type: NodeType, key: &str) -> Option<&'static FieldDescriptor> {
    fields_for(node_type).iter().find(|f| f.key == key)
}

/// The value an editor should display: the stored value, or the field default.
pub fn effective_value(node: &Node, key: &str) -> Option<String> {
    node.data
        .get(key)
        .or_else(|| field(node.node_type(), key).and_then(|f| f.default.map(str::to_string)))
}
