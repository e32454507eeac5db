//! Model directory loading.
//!
//! A model directory holds two JSON files:
//!
//! - `pipeline.json`: `{"tasks": [{"type", "version"?, "args"}]}`
//! - `model.json`: `{"backend", "version"?, "args"}`

use std::fs;
use std::path::{Path, PathBuf};

use prep_model::{BackendConfig, PipelineConfig};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ClassifierError, Result};

pub const PIPELINE_FILE: &str = "pipeline.json";
pub const MODEL_FILE: &str = "model.json";

/// Parsed contents of a model directory.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelDir {
    pub path: PathBuf,
    pub pipeline: PipelineConfig,
    pub backend: BackendConfig,
}

impl ModelDir {
    /// Read and parse both model files under `path`.
    ///
    /// # Errors
    ///
    /// [`ClassifierError::ModelNotFound`] if `path` is not a directory,
    /// [`ClassifierError::Io`] or [`ClassifierError::Json`] for an unreadable
    /// or malformed file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(ClassifierError::ModelNotFound {
                path: path.to_path_buf(),
            });
        }
        let pipeline = read_json(&path.join(PIPELINE_FILE))?;
        let backend = read_json(&path.join(MODEL_FILE))?;
        Ok(Self {
            path: path.to_path_buf(),
            pipeline,
            backend,
        })
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    debug!(path = %path.display(), "reading model file");
    let text = fs::read_to_string(path).map_err(|source| ClassifierError::Io {
        operation: "read",
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ClassifierError::Json {
        path: path.to_path_buf(),
        source,
    })
}
