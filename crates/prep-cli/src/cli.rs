//! CLI argument definitions for the image classification demo.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use prep_model::DEFAULT_DEVICE;

#[derive(Parser)]
#[command(
    name = "image-classification",
    version,
    about = "Classify an image with a model directory",
    long_about = "Classify an image with a model directory.\n\n\
                  The model directory holds pipeline.json (preprocessing tasks)\n\
                  and model.json (inference backend)."
)]
pub struct Cli {
    #[command(flatten)]
    pub classify: ClassifyArgs,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Include timestamps in log lines.
    #[arg(long = "log-timestamps")]
    pub log_timestamps: bool,
}

#[derive(Parser)]
pub struct ClassifyArgs {
    /// Model directory containing pipeline.json and model.json.
    #[arg(value_name = "MODEL_PATH")]
    pub model_path: PathBuf,

    /// Image to classify.
    #[arg(value_name = "IMAGE_PATH")]
    pub image_path: PathBuf,

    /// Device the pipeline and backend are created for.
    #[arg(long = "device", default_value = DEFAULT_DEVICE)]
    pub device: String,

    /// Device ordinal.
    #[arg(long = "device-id", default_value_t = 0)]
    pub device_id: u32,

    /// Downscale so the longest side is at most this many pixels.
    #[arg(long = "max-side", value_name = "PIXELS", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_side: Option<u32>,

    /// Number of result rows to print (default: all returned by the model).
    #[arg(long = "top-k", value_name = "N")]
    pub top_k: Option<usize>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
