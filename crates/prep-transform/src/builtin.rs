//! Registration of the built-in transforms.

use std::sync::OnceLock;

use prep_model::{DEFAULT_DEVICE, Result as PrepResult};
use serde_json::Value;

use crate::error::RegistryError;
use crate::registry::{FnCreator, Registry};
use crate::transform::Transform;
use crate::transforms::{Collect, LoadImage, Normalize};

/// Registry of transform creators.
pub type TransformRegistry = Registry<dyn Transform>;

fn create_collect(args: &Value) -> PrepResult<Box<dyn Transform>> {
    Ok(Box::new(Collect::new(args)?))
}

fn create_load_image(args: &Value) -> PrepResult<Box<dyn Transform>> {
    Ok(Box::new(LoadImage::new(args)?))
}

fn create_normalize(args: &Value) -> PrepResult<Box<dyn Transform>> {
    Ok(Box::new(Normalize::new(args)?))
}

/// Register every built-in transform for the CPU device at version 1.
///
/// # Errors
///
/// [`RegistryError::Duplicate`] if `registry` already holds one of them.
pub fn register_builtin_transforms(registry: &mut TransformRegistry) -> Result<(), RegistryError> {
    registry.register(Box::new(FnCreator::new(
        Collect::NAME,
        DEFAULT_DEVICE,
        1,
        create_collect,
    )))?;
    registry.register(Box::new(FnCreator::new(
        LoadImage::NAME,
        DEFAULT_DEVICE,
        1,
        create_load_image,
    )))?;
    registry.register(Box::new(FnCreator::new(
        Normalize::NAME,
        DEFAULT_DEVICE,
        1,
        create_normalize,
    )))?;
    Ok(())
}

/// Fresh registry holding the built-in transforms.
pub fn build_default_registry() -> Result<TransformRegistry, RegistryError> {
    let mut registry = TransformRegistry::new();
    register_builtin_transforms(&mut registry)?;
    Ok(registry)
}

static DEFAULT_REGISTRY: OnceLock<Result<TransformRegistry, RegistryError>> = OnceLock::new();

/// Process-wide registry of the built-in transforms.
///
/// Built on first access. A registration conflict is reported on every call.
pub fn default_registry() -> Result<&'static TransformRegistry, RegistryError> {
    DEFAULT_REGISTRY
        .get_or_init(build_default_registry)
        .as_ref()
        .map_err(Clone::clone)
}
