use prep_model::PrepError;
use thiserror::Error;

use crate::registry::CreatorKey;

/// Errors raised while registering or instantiating creators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Two creators claimed the same (name, device, version).
    #[error("creator already registered for {key}")]
    Duplicate { key: CreatorKey },

    /// No creator matches the requested name, device and version.
    #[error(
        "no creator registered for '{name}' on device '{device}' ({})",
        describe_version(.version)
    )]
    NotFound {
        name: String,
        device: String,
        version: Option<u32>,
    },

    /// The creator rejected its arguments.
    #[error("failed to create {key}: {source}")]
    Create {
        key: CreatorKey,
        #[source]
        source: PrepError,
    },
}

fn describe_version(version: &Option<u32>) -> String {
    match version {
        Some(version) => format!("version {version}"),
        None => "any version".to_string(),
    }
}

/// A stage failed while processing a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("stage {index} ({stage}) failed: {source}")]
    Stage {
        index: usize,
        stage: String,
        #[source]
        source: PrepError,
    },
}

impl PipelineError {
    /// The error reported by the failing stage.
    pub fn stage_error(&self) -> &PrepError {
        match self {
            Self::Stage { source, .. } => source,
        }
    }

    pub fn into_stage_error(self) -> PrepError {
        match self {
            Self::Stage { source, .. } => source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RegistryError::NotFound {
            name: "Collect".to_string(),
            device: "cuda".to_string(),
            version: None,
        };
        assert_eq!(
            err.to_string(),
            "no creator registered for 'Collect' on device 'cuda' (any version)"
        );

        let err = RegistryError::Duplicate {
            key: CreatorKey::new("Collect", "cpu", 1),
        };
        assert_eq!(err.to_string(), "creator already registered for Collect@cpu v1");
    }
}
