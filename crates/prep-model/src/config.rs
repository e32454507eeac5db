//! Serializable pipeline and backend configuration.
//!
//! A model directory describes its preprocessing as an ordered list of
//! [`TaskConfig`]s and its inference engine as a [`BackendConfig`]. Each entry
//! names a registered creator; `args` is handed to that creator untouched.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::new_document;

/// Device tag used when the caller does not pick one.
pub const DEFAULT_DEVICE: &str = "cpu";

/// One preprocessing stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Registered transform name (e.g. `"Collect"`).
    #[serde(rename = "type")]
    pub name: String,

    /// Exact version to build. `None` selects the highest registered version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,

    /// Transform-specific arguments.
    #[serde(default = "new_document")]
    pub args: Value,
}

impl TaskConfig {
    pub fn new(name: impl Into<String>, args: Value) -> Self {
        Self {
            name: name.into(),
            version: None,
            args,
        }
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }
}

/// Ordered preprocessing stages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub tasks: Vec<TaskConfig>,
}

impl PipelineConfig {
    pub fn new(tasks: Vec<TaskConfig>) -> Self {
        Self { tasks }
    }
}

/// Inference engine selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(rename = "backend")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,

    #[serde(default = "new_document")]
    pub args: Value,
}
