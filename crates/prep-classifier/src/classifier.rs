//! The image classification API.
//!
//! A [`Classifier`] couples the preprocessing pipeline described by a model
//! directory with the backend it names. Instances are immutable after
//! creation and may be shared across threads.

use std::path::{Path, PathBuf};

use prep_model::document::{ORI_IMG, new_document};
use prep_model::{DEFAULT_DEVICE, Mat, ValueExt};
use prep_transform::{Pipeline, TransformRegistry, default_registry};
use tracing::{debug, info, info_span, warn};

use crate::backend::{Backend, BackendRegistry, Class, default_backends};
use crate::error::{ClassifierError, Result};
use crate::model::ModelDir;

pub struct Classifier {
    model_path: PathBuf,
    device: String,
    device_id: u32,
    pipeline: Pipeline,
    backend: Box<dyn Backend>,
}

impl Classifier {
    /// Create a classifier from a model directory using the built-in
    /// transforms and backends.
    ///
    /// # Errors
    ///
    /// See [`ClassifierError::status`] for how failures map to status codes.
    pub fn create_by_path(
        model_path: impl AsRef<Path>,
        device: &str,
        device_id: u32,
    ) -> Result<Self> {
        Self::create_with_registries(
            model_path,
            device,
            device_id,
            default_registry()?,
            default_backends()?,
        )
    }

    /// Create a classifier resolving tasks and the backend in the given
    /// registries.
    pub fn create_with_registries(
        model_path: impl AsRef<Path>,
        device: &str,
        device_id: u32,
        transforms: &TransformRegistry,
        backends: &BackendRegistry,
    ) -> Result<Self> {
        let model = ModelDir::load(model_path)?;
        if device == DEFAULT_DEVICE && device_id != 0 {
            warn!(device_id, "device id is ignored on {DEFAULT_DEVICE}");
        }
        let pipeline = Pipeline::from_config(&model.pipeline, device, transforms)?;
        let backend = backends.create(
            &model.backend.name,
            device,
            model.backend.version,
            &model.backend.args,
        )?;
        info!(
            model = %model.path.display(),
            device,
            device_id,
            backend = backend.name(),
            "created classifier"
        );
        Ok(Self {
            model_path: model.path,
            device: device.to_string(),
            device_id,
            pipeline,
            backend,
        })
    }

    /// Classify each image in `mats`.
    ///
    /// Returns one result list per image, in input order, each sorted by
    /// descending score.
    ///
    /// # Errors
    ///
    /// [`ClassifierError::InvalidInput`] for an empty batch or a malformed
    /// image, otherwise the first preprocessing or inference failure.
    pub fn apply(&self, mats: &[Mat]) -> Result<Vec<Vec<Class>>> {
        if mats.is_empty() {
            return Err(ClassifierError::invalid_input("no images given"));
        }
        let _span = info_span!("classifier_apply", count = mats.len()).entered();

        mats.iter()
            .enumerate()
            .map(|(index, mat)| self.classify(index, mat))
            .collect()
    }

    fn classify(&self, index: usize, mat: &Mat) -> Result<Vec<Class>> {
        mat.validate()
            .map_err(|e| ClassifierError::invalid_input(format!("image {index}: {e}")))?;

        let mut document = new_document();
        let raw = mat
            .to_value()
            .map_err(|e| ClassifierError::invalid_input(format!("image {index}: {e}")))?;
        document
            .set_path(&[ORI_IMG], raw)
            .map_err(|e| ClassifierError::invalid_input(e.to_string()))?;

        let payload = self
            .pipeline
            .process(document)
            .map_err(|source| ClassifierError::Pipeline { index, source })?;
        let classes = self
            .backend
            .infer(&payload)
            .map_err(|source| ClassifierError::Backend {
                backend: self.backend.name().to_string(),
                index,
                source,
            })?;
        debug!(index, results = classes.len(), "classified image");
        Ok(classes)
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    pub fn device_id(&self) -> u32 {
        self.device_id
    }

    /// Preprocessing stage names in execution order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.pipeline.stage_names()
    }
}

impl Drop for Classifier {
    fn drop(&mut self) {
        debug!(model = %self.model_path.display(), "destroying classifier");
    }
}
