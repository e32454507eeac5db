//! Field selection into the payload consumed by inference.
//!
//! `Collect` is normally the last stage of a pipeline. It builds a fresh
//! document holding only:
//!
//! - `ori_img` and `attribute`, forwarded whenever present because callers
//!   supply them directly rather than an upstream stage;
//! - every configured `meta_keys` entry found in the input, nested under
//!   `img_metas` (absent entries are skipped);
//! - every configured `keys` entry, each of which must be present.
//!
//! # Configuration
//!
//! ```json
//! { "keys": ["img"], "meta_keys": ["ori_shape", "img_shape"] }
//! ```

use prep_model::document::{IMG_METAS, PASSTHROUGH_KEYS, new_document};
use prep_model::{PrepError, Result, ValueExt};
use serde_json::Value;
use tracing::{debug, info};

use crate::transform::{Transform, dump};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collect {
    keys: Vec<String>,
    meta_keys: Vec<String>,
}

impl Collect {
    pub const NAME: &'static str = "Collect";

    /// Configure from `{keys, meta_keys?}`.
    ///
    /// # Errors
    ///
    /// [`PrepError::InvalidArgument`] if `keys` is missing or not an array, or
    /// if `meta_keys` is present but not an array.
    /// [`PrepError::TypeMismatch`] if either array holds a non-string.
    pub fn new(args: &Value) -> Result<Self> {
        if !args.get("keys").is_some_and(Value::is_array) {
            return Err(PrepError::invalid_argument(
                "'keys' is missing from arguments or is not an array",
            ));
        }
        if args.get("meta_keys").is_some_and(|v| !v.is_array()) {
            return Err(PrepError::invalid_argument("'meta_keys' has to be an array"));
        }
        Ok(Self {
            keys: args.string_list("keys")?.unwrap_or_default(),
            meta_keys: args.string_list("meta_keys")?.unwrap_or_default(),
        })
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn meta_keys(&self) -> &[String] {
        &self.meta_keys
    }
}

impl Transform for Collect {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn process(&self, input: &Value) -> Result<Value> {
        debug!(input = %dump(input), "collect input");
        let mut output = new_document();

        for key in PASSTHROUGH_KEYS {
            if let Some(value) = input.get(key) {
                output.set_path(&[key], value.clone())?;
            }
        }

        for meta_key in &self.meta_keys {
            if let Some(value) = input.get(meta_key) {
                output.set_path(&[IMG_METAS, meta_key.as_str()], value.clone())?;
            }
        }

        for key in &self.keys {
            let Some(value) = input.get(key) else {
                info!(key = %key, "missed key '{key}' in input");
                return Err(PrepError::missing(key.as_str()));
            };
            output.set_path(&[key.as_str()], value.clone())?;
        }

        debug!(output = %dump(&output), "collect output");
        Ok(output)
    }
}
