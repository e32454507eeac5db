//! Tests for prep-model types.

use prep_model::document::{ORI_IMG, new_document};
use prep_model::{Mat, PixelFormat, PrepError, Tensor, ValueExt};
use serde_json::json;

#[test]
fn mat_survives_a_document() {
    let mat = Mat::new(2, 2, PixelFormat::Bgr, (0..12).collect()).unwrap();
    let mut doc = new_document();
    doc.set_path(&[ORI_IMG], mat.to_value().unwrap()).unwrap();

    assert!(doc.contains(ORI_IMG));
    let restored = Mat::from_value(&doc[ORI_IMG], ORI_IMG).unwrap();
    assert_eq!(restored, mat);
}

#[test]
fn malformed_mat_is_a_type_mismatch() {
    let doc = json!({"ori_img": {"height": 1, "width": 1}});
    let err = Mat::from_value(&doc[ORI_IMG], ORI_IMG).unwrap_err();
    assert!(matches!(err, PrepError::TypeMismatch { found: "object", .. }));
}

#[test]
fn tensor_shape_must_cover_data() {
    let value = json!({"shape": [2, 2, 3], "data": [0.0, 1.0]});
    let err = Tensor::from_value(&value, "img").unwrap_err();
    assert!(matches!(err, PrepError::InvalidArgument { .. }));
}
