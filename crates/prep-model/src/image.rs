//! Image and tensor payloads carried inside pipeline documents.
//!
//! A [`Mat`] is the raw interleaved 8-bit image handed to the classifier and
//! stored under `ori_img`. A [`Tensor`] is the float HWC buffer produced from
//! it by the loading stage and consumed by normalization and inference.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PrepError, Result};
use crate::value::decode;

/// Channel layout of a [`Mat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormat {
    Bgr,
    Rgb,
    Grayscale,
}

impl PixelFormat {
    pub fn channels(self) -> usize {
        match self {
            Self::Bgr | Self::Rgb => 3,
            Self::Grayscale => 1,
        }
    }
}

/// Interleaved 8-bit image, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mat {
    pub height: usize,
    pub width: usize,
    pub channels: usize,
    pub format: PixelFormat,
    pub data: Vec<u8>,
}

impl Mat {
    /// Build a mat, checking that `data` covers `height * width * channels`.
    pub fn new(height: usize, width: usize, format: PixelFormat, data: Vec<u8>) -> Result<Self> {
        let mat = Self {
            height,
            width,
            channels: format.channels(),
            format,
            data,
        };
        mat.validate()?;
        Ok(mat)
    }

    pub fn validate(&self) -> Result<()> {
        if self.height == 0 || self.width == 0 {
            return Err(PrepError::invalid_argument(format!(
                "image must not be empty, got {}x{}",
                self.height, self.width
            )));
        }
        if self.channels != self.format.channels() {
            return Err(PrepError::invalid_argument(format!(
                "{:?} image declares {} channels",
                self.format, self.channels
            )));
        }
        let expected = checked_len(&self.shape())?;
        if self.data.len() != expected {
            return Err(PrepError::invalid_argument(format!(
                "image buffer holds {} bytes, expected {expected}",
                self.data.len()
            )));
        }
        Ok(())
    }

    pub fn shape(&self) -> [usize; 3] {
        [self.height, self.width, self.channels]
    }

    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self)
            .map_err(|e| PrepError::invalid_argument(format!("unencodable image: {e}")))
    }

    /// Decode and validate a mat stored at `path` in a document.
    pub fn from_value(value: &Value, path: &str) -> Result<Self> {
        let mat: Self = decode(value, path)?;
        mat.validate()?;
        Ok(mat)
    }
}

/// Element count of `shape`, rejecting dimensions whose product overflows.
fn checked_len(shape: &[usize]) -> Result<usize> {
    shape
        .iter()
        .try_fold(1usize, |len, &dim| len.checked_mul(dim))
        .ok_or_else(|| PrepError::invalid_argument(format!("shape {shape:?} is too large")))
}

/// Dense float tensor in HWC layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tensor {
    pub shape: Vec<usize>,
    pub data: Vec<f32>,
}

impl Tensor {
    /// Convert a mat to a float tensor, optionally swapping BGR and RGB.
    ///
    /// Grayscale mats are never reordered.
    pub fn from_mat(mat: &Mat, swap_rb: bool) -> Self {
        let mut data: Vec<f32> = mat.data.iter().map(|&b| f32::from(b)).collect();
        if swap_rb && mat.channels == 3 {
            for pixel in data.chunks_exact_mut(3) {
                pixel.swap(0, 2);
            }
        }
        Self {
            shape: mat.shape().to_vec(),
            data,
        }
    }

    /// Innermost dimension; 1 for scalars and vectors without a channel axis.
    pub fn channels(&self) -> usize {
        if self.shape.len() < 3 {
            1
        } else {
            self.shape.last().copied().unwrap_or(1)
        }
    }

    pub fn validate(&self) -> Result<()> {
        let expected = checked_len(&self.shape)?;
        if self.shape.is_empty() || self.data.len() != expected {
            return Err(PrepError::invalid_argument(format!(
                "tensor of shape {:?} holds {} elements",
                self.shape,
                self.data.len()
            )));
        }
        Ok(())
    }

    /// Mean value of each channel.
    pub fn channel_means(&self) -> Vec<f32> {
        let channels = self.channels();
        let mut sums = vec![0f64; channels];
        for pixel in self.data.chunks_exact(channels) {
            for (sum, value) in sums.iter_mut().zip(pixel) {
                *sum += f64::from(*value);
            }
        }
        let count = (self.data.len() / channels).max(1) as f64;
        sums.into_iter().map(|sum| (sum / count) as f32).collect()
    }

    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self)
            .map_err(|e| PrepError::invalid_argument(format!("unencodable tensor: {e}")))
    }

    pub fn from_value(value: &Value, path: &str) -> Result<Self> {
        let tensor: Self = decode(value, path)?;
        tensor.validate()?;
        Ok(tensor)
    }
}
