//! Inference backends.
//!
//! A backend turns the payload produced by the preprocessing pipeline into a
//! ranked list of classes. Backends are created through the same versioned
//! registry as transforms, keyed by the `backend` name in `model.json`.

use std::sync::OnceLock;

use prep_model::{DEFAULT_DEVICE, Result as PrepResult};
use prep_transform::{FnCreator, Registry, RegistryError};
use serde::Serialize;
use serde_json::Value;

use crate::centroid::NearestCentroid;

/// One classification result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Class {
    pub label_id: i32,
    pub score: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// An inference engine.
pub trait Backend: Send + Sync {
    fn name(&self) -> &str;

    /// Classify one preprocessed payload.
    ///
    /// Results are sorted by descending score.
    ///
    /// # Errors
    ///
    /// Returns a [`prep_model::PrepError`] when the payload lacks the fields
    /// the backend reads or their shape does not fit the model.
    fn infer(&self, payload: &Value) -> PrepResult<Vec<Class>>;
}

pub type BackendRegistry = Registry<dyn Backend>;

fn create_nearest_centroid(args: &Value) -> PrepResult<Box<dyn Backend>> {
    Ok(Box::new(NearestCentroid::new(args)?))
}

/// Register every built-in backend.
///
/// # Errors
///
/// [`RegistryError::Duplicate`] if `registry` already holds one of them.
pub fn register_builtin_backends(registry: &mut BackendRegistry) -> Result<(), RegistryError> {
    registry.register(Box::new(FnCreator::new(
        NearestCentroid::NAME,
        DEFAULT_DEVICE,
        1,
        create_nearest_centroid,
    )))
}

pub fn build_default_backends() -> Result<BackendRegistry, RegistryError> {
    let mut registry = BackendRegistry::new();
    register_builtin_backends(&mut registry)?;
    Ok(registry)
}

static DEFAULT_BACKENDS: OnceLock<Result<BackendRegistry, RegistryError>> = OnceLock::new();

/// Process-wide registry of the built-in backends.
pub fn default_backends() -> Result<&'static BackendRegistry, RegistryError> {
    DEFAULT_BACKENDS
        .get_or_init(build_default_backends)
        .as_ref()
        .map_err(Clone::clone)
}
