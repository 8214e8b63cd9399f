use crate::error::ConfigError;
use crate::flow::DEFAULT_FLOW_NAME;
use crate::graph::DEFAULT_NODE_SPACING;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Editor settings, usually read from a TOML file.
///
/// ```toml
/// storage_dir = "~/.local/share/agentflow"
/// default_flow_name = "Support Bot"
/// starter_node = false
/// node_spacing = 150.0
/// pretty_export = true
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EditorConfig {
    /// Directory used by the file-backed store. `None` lets the caller pick a platform default.
    #[serde(default)]
    pub storage_dir: Option<String>,
    #[serde(default = "default_flow_name")]
    pub default_flow_name: String,
    /// Whether new flows start with a message node at the origin.
    #[serde(default = "default_starter_node")]
    pub starter_node: bool,
    /// Vertical gap between nodes added from the palette.
    #[serde(default = "default_node_spacing")]
    pub node_spacing: f64,
    #[serde(default = "default_pretty_export")]
    pub pretty_export: bool,
}

fn default_flow_name() -> String {
    DEFAULT_FLOW_NAME.to_string()
}
fn default_starter_node() -> bool {
    true
}
fn default_node_spacing() -> f64 {
    DEFAULT_NODE_SPACING
}
fn default_pretty_export() -> bool {
    true
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            storage_dir: None,
            default_flow_name: default_flow_name(),
            starter_node: default_starter_node(),
            node_spacing: default_node_spacing(),
            pretty_export: default_pretty_export(),
        }
    }
}

impl EditorConfig {
    /// Reads a TOML config file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|err| match err {
            ConfigError::Invalid(message) => ConfigError::Parse {
                path: path.display().to_string(),
                message,
            },
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if !config.node_spacing.is_finite() {
            return Err(ConfigError::Invalid(
                "node_spacing must be a finite number".to_string(),
            ));
        }
        Ok(config)
    }

    /// The configured storage directory with a leading `~/` expanded, if set.
    pub fn storage_path(&self) -> Option<PathBuf> {
        let dir = self.storage_dir.as_deref()?;
        match dir.strip_prefix("~/") {
            Some(rest) => dirs::home_dir().map(|home| home.join(rest)),
            None => Some(PathBuf::from(dir)),
        }
    }
}
