//! Image classification over a registry-built preprocessing pipeline.
//!
//! A model directory describes the preprocessing tasks (`pipeline.json`) and
//! the inference backend (`model.json`). [`Classifier::create_by_path`] loads
//! both; [`Classifier::apply`] runs a batch of images through them.

pub mod backend;
pub mod centroid;
pub mod classifier;
pub mod error;
pub mod model;

pub use backend::{
    Backend, BackendRegistry, Class, build_default_backends, default_backends,
    register_builtin_backends,
};
pub use centroid::NearestCentroid;
pub use classifier::Classifier;
pub use error::{ClassifierError, Result, Status};
pub use model::{MODEL_FILE, ModelDir, PIPELINE_FILE};
