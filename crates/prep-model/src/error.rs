use thiserror::Error;

/// Failures raised while configuring or running a pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrepError {
    /// Malformed or missing configuration. Construction does not complete.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// A required field is absent from a runtime document.
    #[error("missing required field '{key}'")]
    MissingRequiredField { key: String },

    /// A field holds a different variant than the one requested.
    #[error("type mismatch at '{path}': expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: String,
        found: &'static str,
    },
}

impl PrepError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn missing(key: impl Into<String>) -> Self {
        Self::MissingRequiredField { key: key.into() }
    }

    pub fn type_mismatch(
        path: impl Into<String>,
        expected: impl Into<String>,
        found: &'static str,
    ) -> Self {
        Self::TypeMismatch {
            path: path.into(),
            expected: expected.into(),
            found,
        }
    }
}

pub type Result<T> = std::result::Result<T, PrepError>;
