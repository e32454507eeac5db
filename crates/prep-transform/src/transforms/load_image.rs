//! Converts the caller's raw image into a float tensor.

use prep_model::document::{IMG, IMG_SHAPE, ORI_IMG, ORI_SHAPE};
use prep_model::{Mat, PixelFormat, PrepError, Result, Tensor, ValueExt};
use serde_json::{Value, json};
use tracing::debug;

use crate::transform::Transform;

/// Reads `ori_img` and adds `img`, `ori_shape` and `img_shape`.
///
/// With `to_rgb` set, BGR input is reordered to RGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadImage {
    to_rgb: bool,
}

impl LoadImage {
    pub const NAME: &'static str = "LoadImage";

    pub fn new(args: &Value) -> Result<Self> {
        let to_rgb = match args.get("to_rgb") {
            None => false,
            Some(value) => value
                .as_bool()
                .ok_or_else(|| PrepError::invalid_argument("'to_rgb' has to be a bool"))?,
        };
        Ok(Self { to_rgb })
    }
}

impl Transform for LoadImage {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn process(&self, input: &Value) -> Result<Value> {
        let raw = input.get(ORI_IMG).ok_or_else(|| PrepError::missing(ORI_IMG))?;
        let mat = Mat::from_value(raw, ORI_IMG)?;
        let swap_rb = self.to_rgb && mat.format == PixelFormat::Bgr;
        debug!(
            height = mat.height,
            width = mat.width,
            format = ?mat.format,
            swap_rb,
            "loading image"
        );

        let tensor = Tensor::from_mat(&mat, swap_rb);
        let shape = json!(mat.shape());
        let mut output = input.clone();
        output.set_path(&[IMG], tensor.to_value()?)?;
        output.set_path(&[ORI_SHAPE], shape.clone())?;
        output.set_path(&[IMG_SHAPE], shape)?;
        Ok(output)
    }
}
