//! Per-channel mean/std normalization of `img`.

use prep_model::document::{IMG, IMG_NORM_CFG};
use prep_model::{PrepError, Result, Tensor, ValueExt};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::transform::Transform;

#[derive(Debug, Clone, PartialEq)]
pub struct Normalize {
    mean: Vec<f32>,
    std: Vec<f32>,
}

impl Normalize {
    pub const NAME: &'static str = "Normalize";

    /// Configure from `{mean, std}`, one entry per channel.
    ///
    /// # Errors
    ///
    /// [`PrepError::InvalidArgument`] unless both are non-empty number arrays
    /// of equal length with no zero in `std`.
    pub fn new(args: &Value) -> Result<Self> {
        let mean = channel_list(args, "mean")?;
        let std = channel_list(args, "std")?;
        if mean.len() != std.len() {
            return Err(PrepError::invalid_argument(format!(
                "'mean' has {} channels but 'std' has {}",
                mean.len(),
                std.len()
            )));
        }
        if std.contains(&0.0) {
            return Err(PrepError::invalid_argument("'std' must not contain zero"));
        }
        Ok(Self { mean, std })
    }
}

fn channel_list(args: &Value, key: &str) -> Result<Vec<f32>> {
    let values = args
        .get(key)
        .and_then(|value| Vec::<f32>::deserialize(value).ok())
        .ok_or_else(|| {
            PrepError::invalid_argument(format!("'{key}' has to be an array of numbers"))
        })?;
    if values.is_empty() {
        return Err(PrepError::invalid_argument(format!("'{key}' is empty")));
    }
    Ok(values)
}

impl Transform for Normalize {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn process(&self, input: &Value) -> Result<Value> {
        let raw = input.get(IMG).ok_or_else(|| PrepError::missing(IMG))?;
        let mut tensor = Tensor::from_value(raw, IMG)?;
        let channels = tensor.channels();
        if channels != self.mean.len() {
            return Err(PrepError::invalid_argument(format!(
                "image has {channels} channels, normalization expects {}",
                self.mean.len()
            )));
        }

        for pixel in tensor.data.chunks_exact_mut(channels) {
            for ((value, mean), std) in pixel.iter_mut().zip(&self.mean).zip(&self.std) {
                *value = (*value - mean) / std;
            }
        }

        let mut output = input.clone();
        output.set_path(&[IMG], tensor.to_value()?)?;
        output.set_path(
            &[IMG_NORM_CFG],
            json!({ "mean": self.mean, "std": self.std }),
        )?;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(data: Vec<f32>) -> Value {
        let tensor = Tensor {
            shape: vec![1, data.len() / 3, 3],
            data,
        };
        json!({ "img": tensor.to_value().unwrap() })
    }

    #[test]
    fn normalizes_each_channel() {
        let normalize =
            Normalize::new(&json!({"mean": [10, 20, 30], "std": [2, 4, 5]})).unwrap();
        let output = normalize
            .process(&image(vec![12.0, 24.0, 40.0, 10.0, 20.0, 30.0]))
            .unwrap();
        let tensor = Tensor::from_value(&output["img"], "img").unwrap();
        assert_eq!(tensor.data, vec![1.0, 1.0, 2.0, 0.0, 0.0, 0.0]);
        assert_eq!(
            output["img_norm_cfg"],
            json!({"mean": [10.0, 20.0, 30.0], "std": [2.0, 4.0, 5.0]})
        );
    }

    #[test]
    fn rejects_overflowing_image_shape() {
        let normalize = Normalize::new(&json!({"mean": [0], "std": [1]})).unwrap();
        let err = normalize
            .process(&json!({"img": {"shape": [1usize << 40, 1usize << 40, 1], "data": []}}))
            .unwrap_err();
        assert!(matches!(err, PrepError::InvalidArgument { .. }));
    }

    #[test]
    fn rejects_bad_configuration() {
        for args in [
            json!({}),
            json!({"mean": [1, 2, 3]}),
            json!({"mean": [], "std": []}),
            json!({"mean": [1, 2], "std": [1, 2, 3]}),
            json!({"mean": [1, 2, 3], "std": [1, 0, 1]}),
            json!({"mean": ["a"], "std": [1]}),
        ] {
            let err = Normalize::new(&args).unwrap_err();
            assert!(matches!(err, PrepError::InvalidArgument { .. }), "{args}");
        }
    }

    #[test]
    fn channel_count_must_match() {
        let normalize = Normalize::new(&json!({"mean": [0], "std": [1]})).unwrap();
        let err = normalize.process(&image(vec![1.0, 2.0, 3.0])).unwrap_err();
        assert!(matches!(err, PrepError::InvalidArgument { .. }));
    }

    #[test]
    fn missing_image_fails() {
        let normalize = Normalize::new(&json!({"mean": [0], "std": [1]})).unwrap();
        let err = normalize.process(&json!({})).unwrap_err();
        assert_eq!(err, PrepError::missing("img"));
    }
}
