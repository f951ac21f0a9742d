//! Error taxonomy for the analysis pipeline
//!
//! Every variant is terminal for the current invocation. Nothing here is
//! retried: a missing artifact or a bad configuration does not fix itself.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, analyzing, or rendering simulation statistics
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Statistics source not found: {path}: {reason}")]
    SourceNotFound { path: PathBuf, reason: String },

    #[error("Invalid statistics source{}: {message}", location(.path, .run_id, .field))]
    SourceFormat {
        path: Option<PathBuf>,
        run_id: Option<String>,
        field: Option<String>,
        message: String,
    },

    #[error("Cannot compute a baseline over an empty record set")]
    EmptyInput,

    #[error("Cannot write plot to {path}: {reason}")]
    RenderTarget { path: PathBuf, reason: String },

    #[error("Cannot write statistics artifact {path}: {reason}")]
    ArtifactWrite { path: PathBuf, reason: String },

    #[error("Plot drawing failed: {0}")]
    PlotDrawing(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

impl AnalysisError {
    /// Build a `SourceFormat` error with only a message
    pub fn format(message: impl Into<String>) -> Self {
        Self::SourceFormat {
            path: None,
            run_id: None,
            field: None,
            message: message.into(),
        }
    }

    /// Build a `SourceFormat` error pinned to a run and field
    pub fn field_format(
        run_id: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::SourceFormat {
            path: None,
            run_id: Some(run_id.into()),
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Attach the artifact path to a `SourceFormat` error that lacks one
    pub fn with_path(self, artifact: impl Into<PathBuf>) -> Self {
        match self {
            Self::SourceFormat {
                path: None,
                run_id,
                field,
                message,
            } => Self::SourceFormat {
                path: Some(artifact.into()),
                run_id,
                field,
                message,
            },
            other => other,
        }
    }
}

fn location(path: &Option<PathBuf>, run_id: &Option<String>, field: &Option<String>) -> String {
    let mut parts = Vec::new();
    if let Some(path) = path {
        parts.push(format!("file {}", path.display()));
    }
    if let Some(run_id) = run_id {
        parts.push(format!("run '{}'", run_id));
    }
    if let Some(field) = field {
        parts.push(format!("field '{}'", field));
    }

    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_format_message_includes_context() {
        let err = AnalysisError::field_format("r1", "ipc", "field is missing")
            .with_path("/tmp/five_stats.json");
        let msg = err.to_string();
        assert!(msg.contains("/tmp/five_stats.json"));
        assert!(msg.contains("run 'r1'"));
        assert!(msg.contains("field 'ipc'"));
        assert!(msg.contains("field is missing"));
    }

    #[test]
    fn test_source_format_without_context() {
        let err = AnalysisError::format("top-level value is not an object");
        assert_eq!(
            err.to_string(),
            "Invalid statistics source: top-level value is not an object"
        );
    }

    #[test]
    fn test_with_path_keeps_existing_path() {
        let err = AnalysisError::format("bad").with_path("a.json").with_path("b.json");
        match err {
            AnalysisError::SourceFormat { path, .. } => {
                assert_eq!(path, Some(PathBuf::from("a.json")));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_with_path_ignores_other_variants() {
        let err = AnalysisError::EmptyInput.with_path("a.json");
        assert!(matches!(err, AnalysisError::EmptyInput));
    }
}
