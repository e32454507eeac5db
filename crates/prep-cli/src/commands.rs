use std::path::PathBuf;
use std::slice;

use anyhow::{Context, Result, anyhow};
use prep_classifier::{Class, Classifier};
use tracing::{info, info_span};

use crate::cli::ClassifyArgs;
use prep_cli::image_io::load_mat;

/// Outcome of classifying one image.
pub struct Classification {
    pub image_path: PathBuf,
    pub width: usize,
    pub height: usize,
    pub stages: Vec<String>,
    pub classes: Vec<Class>,
}

pub fn run_classify(args: &ClassifyArgs) -> Result<Classification> {
    let span = info_span!("classify", image = %args.image_path.display());
    let _guard = span.enter();

    let mat = load_mat(&args.image_path, args.max_side)
        .with_context(|| format!("failed to load image: {}", args.image_path.display()))?;
    info!(height = mat.height, width = mat.width, "loaded image");

    let classifier = Classifier::create_by_path(&args.model_path, &args.device, args.device_id)
        .map_err(|error| {
            let code = error.status().code();
            anyhow!(error).context(format!("failed to create classifier, code: {code}"))
        })?;

    let mut results = classifier
        .apply(slice::from_ref(&mat))
        .map_err(|error| {
            let code = error.status().code();
            anyhow!(error).context(format!("failed to apply classifier, code: {code}"))
        })?;

    Ok(Classification {
        image_path: args.image_path.clone(),
        width: mat.width,
        height: mat.height,
        stages: classifier
            .stage_names()
            .into_iter()
            .map(str::to_string)
            .collect(),
        classes: results.pop().unwrap_or_default(),
    })
}
