//! Well-known document field names.

use serde_json::{Map, Value};

/// Raw image supplied by the caller. Always forwarded by `Collect`.
pub const ORI_IMG: &str = "ori_img";

/// Caller-supplied attributes. Always forwarded by `Collect`.
pub const ATTRIBUTE: &str = "attribute";

/// Nested mapping that receives `meta_keys` entries.
pub const IMG_METAS: &str = "img_metas";

pub const IMG: &str = "img";
pub const ORI_SHAPE: &str = "ori_shape";
pub const IMG_SHAPE: &str = "img_shape";
pub const IMG_NORM_CFG: &str = "img_norm_cfg";

/// Fields that come from the user rather than from upstream stages.
pub const PASSTHROUGH_KEYS: [&str; 2] = [ORI_IMG, ATTRIBUTE];

/// An empty document.
pub fn new_document() -> Value {
    Value::Object(Map::new())
}
