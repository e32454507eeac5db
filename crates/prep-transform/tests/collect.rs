//! Integration tests for the Collect transform.

use std::thread;

use prep_model::PrepError;
use prep_transform::{Collect, Transform, default_registry};
use serde_json::json;

// ============================================================================
// Documented scenarios
// ============================================================================

#[test]
fn collects_required_keys_and_metadata() {
    let collect = Collect::new(&json!({"keys": ["img"], "meta_keys": ["ori_shape"]})).unwrap();
    let input = json!({"img": [0.5, 1.5], "ori_shape": [224, 224, 3], "extra": 1});

    let output = collect.process(&input).unwrap();

    assert_eq!(
        output,
        json!({"img": [0.5, 1.5], "img_metas": {"ori_shape": [224, 224, 3]}})
    );
}

#[test]
fn missing_required_key_yields_no_output() {
    let collect = Collect::new(&json!({"keys": ["img", "label"]})).unwrap();

    let err = collect.process(&json!({"img": [0.5]})).unwrap_err();

    assert_eq!(err, PrepError::missing("label"));
    assert_eq!(err.to_string(), "missing required field 'label'");
}

#[test]
fn forwards_caller_fields_with_empty_configuration() {
    let collect = Collect::new(&json!({"keys": [], "meta_keys": []})).unwrap();
    let input = json!({"ori_img": [0, 128, 255], "attribute": {"x": 1}});

    assert_eq!(collect.process(&input).unwrap(), input);
}

#[test]
fn absent_meta_keys_are_skipped() {
    let collect =
        Collect::new(&json!({"keys": ["img"], "meta_keys": ["flip", "scale_factor"]})).unwrap();

    let output = collect.process(&json!({"img": 1, "scale_factor": 2.0})).unwrap();

    assert_eq!(output, json!({"img": 1, "img_metas": {"scale_factor": 2.0}}));
}

#[test]
fn input_is_left_untouched() {
    let collect = Collect::new(&json!({"keys": ["img"]})).unwrap();
    let input = json!({"img": [1, 2], "extra": true});
    let before = input.clone();

    collect.process(&input).unwrap();

    assert_eq!(input, before);
}

#[test]
fn output_layout_is_stable() {
    let collect = Collect::new(&json!({
        "keys": ["img"],
        "meta_keys": ["ori_shape"]
    }))
    .unwrap();
    let output = collect
        .process(&json!({"img": [0.5, 1.5], "ori_shape": [224, 224, 3]}))
        .unwrap();

    let pretty = serde_json::to_string_pretty(&output).unwrap();
    insta::assert_snapshot!(pretty, @r#"
    {
      "img_metas": {
        "ori_shape": [
          224,
          224,
          3
        ]
      },
      "img": [
        0.5,
        1.5
      ]
    }
    "#);
}

// ============================================================================
// Registry-built instances
// ============================================================================

#[test]
fn registry_builds_collect() {
    let registry = default_registry().unwrap();
    let collect = registry
        .create("Collect", "cpu", Some(1), &json!({"keys": ["img"]}))
        .unwrap();

    assert_eq!(collect.name(), "Collect");
    assert_eq!(
        collect.process(&json!({"img": 3, "other": 4})).unwrap(),
        json!({"img": 3})
    );
}

#[test]
fn shared_instance_serves_concurrent_calls() {
    let collect = Collect::new(&json!({"keys": ["img"], "meta_keys": ["id"]})).unwrap();

    thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|id| {
                let collect = &collect;
                scope.spawn(move || collect.process(&json!({"img": [id], "id": id})))
            })
            .collect();

        for (id, handle) in handles.into_iter().enumerate() {
            let output = handle.join().unwrap().unwrap();
            assert_eq!(output, json!({"img": [id], "img_metas": {"id": id}}));
        }
    });
}
