//! Ordered composition of transforms.
//!
//! A [`Pipeline`] feeds each stage's output into the next and stops at the
//! first failure. Pipelines are built from a [`PipelineConfig`] by looking up
//! each task in a [`TransformRegistry`].
//!
//! # Example
//!
//! ```ignore
//! use prep_transform::{Pipeline, default_registry};
//!
//! let pipeline = Pipeline::from_config(&config, "cpu", default_registry()?)?;
//! let payload = pipeline.process(document)?;
//! ```

use prep_model::{PipelineConfig, Result as PrepResult};
use serde_json::Value;
use tracing::{debug, debug_span, info};

use crate::builtin::TransformRegistry;
use crate::error::{PipelineError, RegistryError};
use crate::transform::Transform;

#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn Transform>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage.
    pub fn add_stage(mut self, stage: Box<dyn Transform>) -> Self {
        self.stages.push(stage);
        self
    }

    /// Instantiate every task of `config` for `device`.
    ///
    /// Tasks without a version use the highest one registered.
    ///
    /// # Errors
    ///
    /// The first [`RegistryError`] raised by a task. Nothing is built in that
    /// case.
    pub fn from_config(
        config: &PipelineConfig,
        device: &str,
        registry: &TransformRegistry,
    ) -> Result<Self, RegistryError> {
        let stages = config
            .tasks
            .iter()
            .map(|task| registry.create(&task.name, device, task.version, &task.args))
            .collect::<Result<Vec<_>, _>>()?;
        let pipeline = Self { stages };
        info!(device, stages = ?pipeline.stage_names(), "built pipeline");
        Ok(pipeline)
    }

    /// Run every stage in order.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Stage`] naming the first stage that failed. Later
    /// stages are not run.
    pub fn process(&self, input: Value) -> Result<Value, PipelineError> {
        let mut document = input;
        for (index, stage) in self.stages.iter().enumerate() {
            let _span = debug_span!("stage", index, name = stage.name()).entered();
            document = stage
                .process(&document)
                .map_err(|source| PipelineError::Stage {
                    index,
                    stage: stage.name().to_string(),
                    source,
                })?;
            debug!("stage done");
        }
        Ok(document)
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

impl Transform for Pipeline {
    fn name(&self) -> &str {
        "Pipeline"
    }

    fn process(&self, input: &Value) -> PrepResult<Value> {
        Pipeline::process(self, input.clone()).map_err(PipelineError::into_stage_error)
    }
}
