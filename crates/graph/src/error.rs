//! Error types for graph construction and execution

use ffchain_common::ProcessingError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    #[error("Invalid caller type: {0}")]
    InvalidCallerType(String),

    #[error("Cannot derive a label from {0}")]
    UnresolvedLabelSource(String),

    #[error("run requires an output node as its caller")]
    MissingOutputRoot,

    #[error("{program} exited with status {}: {stderr}", status_text(.code))]
    ExternalProcessFailure {
        program: String,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_yaml::Error),
}

impl From<GraphError> for ProcessingError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::Io(e) => ProcessingError::IoError(e),
            e @ GraphError::ExternalProcessFailure { .. } => {
                ProcessingError::FFmpegError(e.to_string())
            }
            e => ProcessingError::InvalidGraph(e.to_string()),
        }
    }
}

fn status_text(code: &Option<i32>) -> String {
    code.map_or_else(|| "unknown".to_string(), |c| c.to_string())
}

/// Result type for graph operations
pub type Result<T> = std::result::Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_failure_message() {
        let err = GraphError::ExternalProcessFailure {
            program: "ffmpeg".to_string(),
            code: Some(1),
            stdout: String::new(),
            stderr: "No such file".to_string(),
        };
        assert_eq!(err.to_string(), "ffmpeg exited with status 1: No such file");
    }

    #[test]
    fn test_into_processing_error() {
        let err: ProcessingError = GraphError::MissingOutputRoot.into();
        assert!(matches!(err, ProcessingError::InvalidGraph(_)));

        let err: ProcessingError = GraphError::ExternalProcessFailure {
            program: "ffmpeg".to_string(),
            code: None,
            stdout: String::new(),
            stderr: String::new(),
        }
        .into();
        assert!(matches!(err, ProcessingError::FFmpegError(_)));
    }
}
