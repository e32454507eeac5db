//! Nearest-centroid classification over per-channel image means.
//!
//! Each class is described by a centroid in channel space. An image is
//! reduced to its mean value per channel; scores are the softmax of the
//! negated Euclidean distances scaled by `temperature`.
//!
//! # Configuration
//!
//! ```json
//! {
//!   "classes": [
//!     {"label_id": 0, "name": "dark", "centroid": [32, 32, 32]},
//!     {"label_id": 1, "name": "bright", "centroid": [224, 224, 224]}
//!   ],
//!   "temperature": 16.0,
//!   "topk": 5
//! }
//! ```

use std::cmp::Ordering;

use prep_model::document::IMG;
use prep_model::{PrepError, Result, Tensor};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::backend::{Backend, Class};

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct CentroidClass {
    label_id: i32,
    #[serde(default)]
    name: Option<String>,
    centroid: Vec<f32>,
}

fn default_temperature() -> f32 {
    1.0
}

fn default_topk() -> usize {
    5
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct CentroidArgs {
    classes: Vec<CentroidClass>,
    #[serde(default = "default_temperature")]
    temperature: f32,
    #[serde(default = "default_topk")]
    topk: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NearestCentroid {
    classes: Vec<CentroidClass>,
    channels: usize,
    temperature: f32,
    topk: usize,
}

impl NearestCentroid {
    pub const NAME: &'static str = "NearestCentroid";

    /// Configure from `{classes, temperature?, topk?}`.
    ///
    /// # Errors
    ///
    /// [`PrepError::InvalidArgument`] for an empty class list, centroids of
    /// differing or zero length, a non-positive temperature or a zero `topk`.
    pub fn new(args: &Value) -> Result<Self> {
        let args = CentroidArgs::deserialize(args)
            .map_err(|e| PrepError::invalid_argument(format!("{}: {e}", Self::NAME)))?;

        let channels = match args.classes.first() {
            Some(class) => class.centroid.len(),
            None => return Err(PrepError::invalid_argument("'classes' is empty")),
        };
        if channels == 0 {
            return Err(PrepError::invalid_argument("centroids must not be empty"));
        }
        if let Some(class) = args.classes.iter().find(|c| c.centroid.len() != channels) {
            return Err(PrepError::invalid_argument(format!(
                "centroid of label {} has {} channels, expected {channels}",
                class.label_id,
                class.centroid.len()
            )));
        }
        if !(args.temperature.is_finite() && args.temperature > 0.0) {
            return Err(PrepError::invalid_argument("'temperature' must be positive"));
        }
        if args.topk == 0 {
            return Err(PrepError::invalid_argument("'topk' must be at least 1"));
        }

        Ok(Self {
            classes: args.classes,
            channels,
            temperature: args.temperature,
            topk: args.topk,
        })
    }
}

fn distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

/// Numerically stable softmax.
fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|l| (l - max).exp()).collect();
    let total: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

impl Backend for NearestCentroid {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn infer(&self, payload: &Value) -> Result<Vec<Class>> {
        let raw = payload.get(IMG).ok_or_else(|| PrepError::missing(IMG))?;
        let tensor = Tensor::from_value(raw, IMG)?;
        if tensor.channels() != self.channels {
            return Err(PrepError::invalid_argument(format!(
                "image has {} channels, model expects {}",
                tensor.channels(),
                self.channels
            )));
        }

        let means = tensor.channel_means();
        debug!(?means, "channel means");
        let logits: Vec<f32> = self
            .classes
            .iter()
            .map(|class| -distance(&means, &class.centroid) / self.temperature)
            .collect();

        let mut results: Vec<Class> = self
            .classes
            .iter()
            .zip(softmax(&logits))
            .map(|(class, score)| Class {
                label_id: class.label_id,
                score,
                name: class.name.clone(),
            })
            .collect();
        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then(a.label_id.cmp(&b.label_id))
        });
        results.truncate(self.topk);
        Ok(results)
    }
}
