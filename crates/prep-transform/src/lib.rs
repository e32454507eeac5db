//! Registry-driven document transforms.
//!
//! - **registry**: versioned, device-specific creator lookup
//! - **transform**: the [`Transform`] contract
//! - **transforms**: built-in stages (`LoadImage`, `Normalize`, `Collect`)
//! - **builtin**: registration of the built-in stages
//! - **pipeline**: ordered stage execution

pub mod builtin;
pub mod error;
pub mod pipeline;
pub mod registry;
pub mod transform;
pub mod transforms;

pub use builtin::{
    TransformRegistry, build_default_registry, default_registry, register_builtin_transforms,
};
pub use error::{PipelineError, RegistryError};
pub use pipeline::Pipeline;
pub use registry::{Creator, CreatorKey, FnCreator, Registry};
pub use transform::Transform;
pub use transforms::{Collect, LoadImage, Normalize};
