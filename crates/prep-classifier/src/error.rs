//! Classifier error types and their numeric status codes.

use std::fmt;
use std::path::PathBuf;

use prep_model::PrepError;
use prep_transform::{PipelineError, RegistryError};
use thiserror::Error;

/// Numeric status reported to callers of the classifier API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Status {
    Success = 0,
    InvalidArg = 1,
    NotSupported = 2,
    FileNotExist = 5,
    Fail = 6,
}

impl Status {
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Classifier operation error.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// The model directory does not exist.
    #[error("model directory not found: {}", path.display())]
    ModelNotFound { path: PathBuf },

    /// File I/O error.
    #[error("failed to {operation} {}", path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A model file is not valid JSON or does not match its schema.
    #[error("invalid model file {}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A pipeline task or backend could not be created.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Preprocessing rejected an image.
    #[error("preprocessing failed for image {index}")]
    Pipeline {
        index: usize,
        #[source]
        source: PipelineError,
    },

    /// Inference failed on a preprocessed image.
    #[error("backend '{backend}' failed for image {index}")]
    Backend {
        backend: String,
        index: usize,
        #[source]
        source: PrepError,
    },

    /// The caller handed over no images or a malformed one.
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl ClassifierError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Status code reported for this error.
    pub fn status(&self) -> Status {
        match self {
            Self::ModelNotFound { .. } => Status::FileNotExist,
            Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                Status::FileNotExist
            }
            Self::Io { .. } => Status::Fail,
            Self::Json { .. } | Self::Pipeline { .. } | Self::InvalidInput { .. } => {
                Status::InvalidArg
            }
            Self::Registry(RegistryError::NotFound { .. }) => Status::NotSupported,
            Self::Registry(RegistryError::Create { .. }) => Status::InvalidArg,
            Self::Registry(RegistryError::Duplicate { .. }) | Self::Backend { .. } => Status::Fail,
        }
    }
}

/// Result type alias for classifier operations.
pub type Result<T> = std::result::Result<T, ClassifierError>;
