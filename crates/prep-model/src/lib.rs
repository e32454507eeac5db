//! Shared types for registry-driven preprocessing pipelines.
//!
//! - **value**: typed, fallible access to `serde_json::Value` documents
//! - **document**: reserved field names
//! - **image**: raw image and float tensor payloads
//! - **config**: pipeline and backend configuration
//! - **error**: the error taxonomy shared by every stage

pub mod config;
pub mod document;
pub mod error;
pub mod image;
pub mod value;

pub use config::{BackendConfig, DEFAULT_DEVICE, PipelineConfig, TaskConfig};
pub use error::{PrepError, Result};
pub use image::{Mat, PixelFormat, Tensor};
pub use value::ValueExt;
