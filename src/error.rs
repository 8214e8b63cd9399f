use thiserror::Error;

/// Rejected graph mutations. The graph is left untouched whenever one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Node '{0}' cannot be connected to itself")]
    SelfConnection(String),

    #[error("Node '{source_id}' is already connected to node '{target_id}'")]
    DuplicateConnection { source_id: String, target_id: String },

    #[error("Node '{0}' does not exist in this flow")]
    NodeNotFound(String),

    #[error("Node '{source_id}' has no connection to node '{target_id}'")]
    ConnectionNotFound { source_id: String, target_id: String },
}

/// A persisted or imported flow document that cannot be turned back into a `Flow`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedFlowError {
    #[error("Failed to parse flow JSON: {0}")]
    JsonParseError(String),

    #[error("Flow document must be a JSON object")]
    NotAnObject,

    #[error("Flow document field 'nodes' must be an array")]
    NodesNotSequence,

    #[error("Node entry {index} is missing required field '{field}'")]
    MissingNodeField { index: usize, field: &'static str },

    #[error("Node '{node_id}' has an unrecognized type: '{type_name}'")]
    UnknownNodeType { node_id: String, type_name: String },

    #[error("Node '{node_id}' has an invalid field '{field}': {message}")]
    InvalidNodeField {
        node_id: String,
        field: String,
        message: String,
    },

    #[error("Flow document field '{field}' is invalid: {message}")]
    InvalidFlowField { field: String, message: String },
}

/// Failures of the durable key-value surface underneath the flow store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Storage is unavailable: {0}")]
    Unavailable(String),

    #[error("Storage quota exceeded while writing '{key}' ({needed} bytes, {available} available)")]
    QuotaExceeded {
        key: String,
        needed: usize,
        available: usize,
    },

    #[error("I/O error on '{key}': {message}")]
    Io { key: String, message: String },
}

/// Errors surfaced by `FlowStore` operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Stored record '{key}' is corrupt: {source}")]
    Malformed {
        key: String,
        #[source]
        source: MalformedFlowError,
    },
}

/// User input that must be corrected before an action can proceed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Flow name must not be empty")]
    EmptyName,
}

/// Errors raised while loading an `EditorConfig`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file '{path}': {message}")]
    Parse { path: String, message: String },

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Every recoverable error the editor can report to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    InvalidOperation(#[from] GraphError),

    #[error(transparent)]
    Malformed(#[from] MalformedFlowError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Template '{0}' does not exist")]
    TemplateNotFound(String),

    #[error("Flow '{0}' has no saved record")]
    FlowNotFound(String),
}

impl From<StorageError> for EditorError {
    fn from(err: StorageError) -> Self {
        EditorError::Store(StoreError::Storage(err))
    }
}
