use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Limits enforced by every input processor while the condition is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ProcessorConfig {
    /// Values per field per group.
    pub max_values: usize,
    /// Subgroups per group.
    pub max_groups: usize,
    pub max_nesting_level: usize,
}

impl Default for ProcessorConfig {
    fn default() -> Self { Self { max_values: 10_000, max_groups: 100, max_nesting_level: 100 } }
}

impl ProcessorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> { serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string())) }

    pub fn with_max_values(mut self, max: usize) -> Self {
        self.max_values = max;
        self
    }

    pub fn with_max_groups(mut self, max: usize) -> Self {
        self.max_groups = max;
        self
    }

    pub fn with_max_nesting_level(mut self, max: usize) -> Self {
        self.max_nesting_level = max;
        self
    }
}
