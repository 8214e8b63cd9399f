use crate::graph::FlowGraph;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default display name given to a freshly created flow.
pub const DEFAULT_FLOW_NAME: &str = "New Agent Flow";

/// A named graph of nodes representing one agent's conversational logic.
///
/// `id` and `created_at` are assigned the first time the flow is saved; until then the
/// flow only exists in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct Flow {
    pub id: Option<String>,
    pub name: String,
    pub graph: FlowGraph,
    pub created_at: Option<DateTime<Utc>>,
}

impl Flow {
    /// Creates an empty, unsaved flow.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            graph: FlowGraph::new(),
            created_at: None,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Assigns an id and creation timestamp if the flow has never been saved.
    /// Returns the (possibly pre-existing) id.
    pub fn ensure_identity(&mut self, now: DateTime<Utc>) -> String {
        let id = self
            .id
            .get_or_insert_with(|| format!("flow-{}", uuid::Uuid::new_v4().simple()))
            .clone();
        self.created_at.get_or_insert(now);
        id
    }

    /// Builds the catalog entry for this flow. Returns `None` for a flow that was never saved.
    pub fn summary(&self, status: FlowStatus) -> Option<FlowSummary> {
        let id = self.id.clone()?;
        let created_at = self.created_at?;
        Some(FlowSummary {
            id,
            name: self.name.clone(),
            created_at,
            status,
            description: None,
            last_modified: Some(created_at),
        })
    }
}

impl Default for Flow {
    fn default() -> Self {
        Self::new(DEFAULT_FLOW_NAME)
    }
}

/// Deployment state shown in the flows catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowStatus {
    Active,
    Inactive,
    #[default]
    Draft,
}

impl fmt::Display for FlowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowStatus::Active => write!(f, "active"),
            FlowStatus::Inactive => write!(f, "inactive"),
            FlowStatus::Draft => write!(f, "draft"),
        }
    }
}

/// Lightweight catalog entry describing a saved flow without its node payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowSummary {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub status: FlowStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

impl FlowSummary {
    /// Timestamp shown as "Last modified" in listings.
    pub fn modified_at(&self) -> DateTime<Utc> {
        self.last_modified.unwrap_or(self.created_at)
    }
}
