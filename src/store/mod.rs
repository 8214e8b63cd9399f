//! Persistence boundary for flows and the saved-flows catalog.

use crate::error::{MalformedFlowError, StoreError};
use crate::flow::{Flow, FlowSummary};
use crate::serializer;

mod backend;

pub use backend::{FileStore, KeyValueStore, MemoryStore};

/// Key of the working flow record.
pub const CURRENT_FLOW_KEY: &str = "mkagent-current-flow";
/// Key of the saved-flows catalog.
pub const CATALOG_KEY: &str = "mkagent-flows";
/// Prefix of per-flow saved records, followed by the flow id.
pub const FLOW_KEY_PREFIX: &str = "mkagent-flow-";

/// Loads and saves flows and flow summaries through an injected key-value backend.
///
/// Every operation may fail with a storage error; none of them touch the caller's
/// in-memory flow, so a failed save never loses work.
#[derive(Debug, Clone)]
pub struct FlowStore<S: KeyValueStore> {
    backend: S,
}

impl<S: KeyValueStore> FlowStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }

    fn flow_key(id: &str) -> String {
        format!("{}{}", FLOW_KEY_PREFIX, id)
    }

    fn read_flow(&self, key: &str) -> Result<Option<Flow>, StoreError> {
        match self.backend.get(key)? {
            Some(text) => serializer::from_json_str(&text)
                .map(Some)
                .map_err(|source| StoreError::Malformed {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    /// The working flow, if one was saved.
    pub fn load_current(&self) -> Result<Option<Flow>, StoreError> {
        self.read_flow(CURRENT_FLOW_KEY)
    }

    pub fn save_current(&mut self, flow: &Flow) -> Result<(), StoreError> {
        self.backend
            .set(CURRENT_FLOW_KEY, &serializer::to_json_string(flow))?;
        log::debug!("Saved working flow '{}'", flow.name);
        Ok(())
    }

    /// A saved flow by id.
    pub fn load_flow(&self, id: &str) -> Result<Option<Flow>, StoreError> {
        self.read_flow(&Self::flow_key(id))
    }

    pub fn save_flow(&mut self, id: &str, flow: &Flow) -> Result<(), StoreError> {
        self.backend
            .set(&Self::flow_key(id), &serializer::to_json_string(flow))?;
        Ok(())
    }

    /// Removes a saved flow, its catalog entry and, if it is the working flow, the
    /// working record. Returns whether anything was removed.
    pub fn delete_flow(&mut self, id: &str) -> Result<bool, StoreError> {
        let key = Self::flow_key(id);
        let had_record = self.backend.get(&key)?.is_some();
        self.backend.remove(&key)?;
        let had_summary = self.remove_summary(id)?;

        // A corrupt working record can't be attributed to any flow, so it stays.
        let is_current = matches!(
            self.load_current(),
            Ok(Some(Flow { id: Some(ref current), .. })) if current == id
        );
        if is_current {
            self.backend.remove(CURRENT_FLOW_KEY)?;
        }

        log::info!("Deleted flow '{}'", id);
        Ok(had_record || had_summary || is_current)
    }

    /// Every catalog entry, in the order they were first saved.
    pub fn list_summaries(&self) -> Result<Vec<FlowSummary>, StoreError> {
        match self.backend.get(CATALOG_KEY)? {
            Some(text) => serde_json::from_str(&text).map_err(|e| StoreError::Malformed {
                key: CATALOG_KEY.to_string(),
                source: MalformedFlowError::JsonParseError(e.to_string()),
            }),
            None => Ok(Vec::new()),
        }
    }

    fn write_summaries(&mut self, summaries: &[FlowSummary]) -> Result<(), StoreError> {
        let text = encode_summaries(summaries)?;
        self.backend.set(CATALOG_KEY, &text)?;
        Ok(())
    }

    /// Replaces the entry with the same id in place, or appends a new one.
    pub fn upsert_summary(&mut self, summary: FlowSummary) -> Result<(), StoreError> {
        let mut summaries = self.list_summaries()?;
        merge_summary(&mut summaries, summary);
        self.write_summaries(&summaries)
    }

    /// Writes a saved flow record, the working record and the catalog entry as one step.
    ///
    /// Every key is read before anything is written. If a write fails, the keys written
    /// so far are put back to their previous values.
    pub fn save_all(
        &mut self,
        id: &str,
        flow: &Flow,
        summary: FlowSummary,
    ) -> Result<(), StoreError> {
        let text = serializer::to_json_string(flow);
        let mut summaries = self.list_summaries()?;
        merge_summary(&mut summaries, summary);
        let writes = [
            (Self::flow_key(id), text.clone()),
            (CURRENT_FLOW_KEY.to_string(), text),
            (CATALOG_KEY.to_string(), encode_summaries(&summaries)?),
        ];

        let previous = writes
            .iter()
            .map(|(key, _)| self.backend.get(key))
            .collect::<Result<Vec<_>, _>>()?;

        for (done, (key, value)) in writes.iter().enumerate() {
            if let Err(err) = self.backend.set(key, value) {
                self.restore(&writes[..done], &previous[..done]);
                return Err(err.into());
            }
        }
        Ok(())
    }

    fn restore(&mut self, written: &[(String, String)], previous: &[Option<String>]) {
        for ((key, _), before) in written.iter().zip(previous).rev() {
            let result = match before {
                Some(value) => self.backend.set(key, value),
                None => self.backend.remove(key),
            };
            if let Err(err) = result {
                log::warn!("Could not roll back '{}' after a failed save: {}", key, err);
            }
        }
    }

    /// Returns whether an entry was removed.
    pub fn remove_summary(&mut self, id: &str) -> Result<bool, StoreError> {
        let mut summaries = self.list_summaries()?;
        let before = summaries.len();
        summaries.retain(|s| s.id != id);
        if summaries.len() == before {
            return Ok(false);
        }
        self.write_summaries(&summaries)?;
        Ok(true)
    }
}

fn merge_summary(summaries: &mut Vec<FlowSummary>, summary: FlowSummary) {
    match summaries.iter_mut().find(|s| s.id == summary.id) {
        Some(existing) => *existing = summary,
        None => summaries.push(summary),
    }
}

fn encode_summaries(summaries: &[FlowSummary]) -> Result<String, StoreError> {
    serde_json::to_string(summaries).map_err(|e| StoreError::Malformed {
        key: CATALOG_KEY.to_string(),
        source: MalformedFlowError::JsonParseError(e.to_string()),
    })
}
