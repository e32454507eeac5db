//! Tests for the default transform registry and config-built pipelines.

use prep_model::{Mat, PipelineConfig, PixelFormat, PrepError, TaskConfig, Tensor};
use prep_transform::{
    CreatorKey, Pipeline, PipelineError, RegistryError, TransformRegistry,
    build_default_registry, default_registry, register_builtin_transforms,
};
use serde_json::json;

// ============================================================================
// Registration
// ============================================================================

#[test]
fn default_registry_holds_builtin_transforms() {
    let registry = default_registry().unwrap();
    let keys: Vec<String> = registry.keys().map(ToString::to_string).collect();

    assert_eq!(
        keys,
        ["Collect@cpu v1", "LoadImage@cpu v1", "Normalize@cpu v1"]
    );
}

#[test]
fn default_registry_is_shared() {
    let first = default_registry().unwrap();
    let second = default_registry().unwrap();
    assert!(std::ptr::eq(first, second));
}

#[test]
fn registering_builtins_twice_is_rejected() {
    let mut registry = build_default_registry().unwrap();

    let err = register_builtin_transforms(&mut registry).unwrap_err();

    assert_eq!(
        err,
        RegistryError::Duplicate {
            key: CreatorKey::new("Collect", "cpu", 1)
        }
    );
    assert_eq!(registry.len(), 3);
}

#[test]
fn unknown_device_is_not_found() {
    let registry = default_registry().unwrap();

    let err = registry
        .create("Collect", "cuda", None, &json!({"keys": []}))
        .err()
        .unwrap();

    assert_eq!(
        err,
        RegistryError::NotFound {
            name: "Collect".to_string(),
            device: "cuda".to_string(),
            version: None,
        }
    );
}

#[test]
fn bad_arguments_surface_as_create_errors() {
    let registry = TransformRegistry::default();
    assert!(registry.is_empty());

    let registry = default_registry().unwrap();
    let err = registry
        .create("Collect", "cpu", Some(1), &json!({"keys": "img"}))
        .err()
        .unwrap();

    assert!(matches!(
        err,
        RegistryError::Create {
            source: PrepError::InvalidArgument { .. },
            ..
        }
    ));
}

// ============================================================================
// Pipelines
// ============================================================================

fn classification_config() -> PipelineConfig {
    PipelineConfig::new(vec![
        TaskConfig::new("LoadImage", json!({"to_rgb": true})),
        TaskConfig::new("Normalize", json!({"mean": [0, 0, 0], "std": [2, 2, 2]})),
        TaskConfig::new(
            "Collect",
            json!({"keys": ["img"], "meta_keys": ["ori_shape", "img_norm_cfg"]}),
        )
        .with_version(1),
    ])
}

#[test]
fn pipeline_from_config_runs_every_stage() {
    let pipeline =
        Pipeline::from_config(&classification_config(), "cpu", default_registry().unwrap())
            .unwrap();
    assert_eq!(pipeline.stage_names(), ["LoadImage", "Normalize", "Collect"]);

    let mat = Mat::new(1, 1, PixelFormat::Bgr, vec![2, 4, 6]).unwrap();
    let output = pipeline
        .process(json!({"ori_img": mat.to_value().unwrap(), "attribute": {"id": 9}}))
        .unwrap();

    let tensor = Tensor::from_value(&output["img"], "img").unwrap();
    assert_eq!(tensor.data, vec![3.0, 2.0, 1.0]);
    assert_eq!(output["img_metas"]["ori_shape"], json!([1, 1, 3]));
    assert_eq!(output["attribute"], json!({"id": 9}));
    assert!(output.get("img_shape").is_none());
}

#[test]
fn pipeline_stops_at_first_failing_stage() {
    let pipeline =
        Pipeline::from_config(&classification_config(), "cpu", default_registry().unwrap())
            .unwrap();

    let err = pipeline.process(json!({"attribute": 1})).unwrap_err();

    assert_eq!(
        err,
        PipelineError::Stage {
            index: 0,
            stage: "LoadImage".to_string(),
            source: PrepError::missing("ori_img"),
        }
    );
}

#[test]
fn pipeline_build_fails_on_bad_task() {
    let config = PipelineConfig::new(vec![
        TaskConfig::new("LoadImage", json!({})),
        TaskConfig::new("Collect", json!({})),
    ]);

    let err = Pipeline::from_config(&config, "cpu", default_registry().unwrap())
        .err()
        .unwrap();

    assert!(matches!(err, RegistryError::Create { ref key, .. } if key.name == "Collect"));
}
