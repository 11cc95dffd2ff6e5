//! Error types for the Darkroom transformation pipeline.
//!
//! Errors are organized so a caller can tell "you sent bad data" apart from
//! "the server failed": malformed input, unknown operations, and schema
//! violations are client-attributable; engine and encoding failures are not.

use thiserror::Error;

/// Top-level error type for Darkroom operations.
#[derive(Error, Debug)]
pub enum DarkroomError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Pipeline processing errors, one variant per failure cause.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The step list was not a valid JSON array of step objects
    #[error("Malformed step list: {0}")]
    MalformedInput(String),

    /// The operation name is not in the registry
    #[error("Unsupported operation: {0}")]
    UnknownOperation(String),

    /// The step's params do not conform to the operation's schema
    #[error("Invalid params for \"{operation}\": {detail}")]
    SchemaValidation { operation: String, detail: String },

    /// The underlying transform or probe call failed
    #[error("Engine failure in {call}: {message}")]
    Engine { call: String, message: String },

    /// Final buffer extraction failed
    #[error("Failed to encode output image: {0}")]
    Encoding(String),

    /// Input exceeds the configured size limit
    #[error("File too large: {size_mb}MB > {max_mb}MB")]
    FileTooLarge { size_mb: u64, max_mb: u64 },
}

impl PipelineError {
    /// Whether the failure was caused by the caller's request rather than
    /// the engine or the host. HTTP layers map these to 4xx responses.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PipelineError::MalformedInput(_)
                | PipelineError::UnknownOperation(_)
                | PipelineError::SchemaValidation { .. }
                | PipelineError::FileTooLarge { .. }
        )
    }
}

/// Convenience type alias for Darkroom results.
pub type Result<T> = std::result::Result<T, DarkroomError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_are_flagged() {
        assert!(PipelineError::MalformedInput("not json".into()).is_client_error());
        assert!(PipelineError::UnknownOperation("sharpen".into()).is_client_error());
        assert!(PipelineError::SchemaValidation {
            operation: "crop".into(),
            detail: "missing field `height`".into(),
        }
        .is_client_error());
        assert!(PipelineError::FileTooLarge {
            size_mb: 120,
            max_mb: 100
        }
        .is_client_error());
    }

    #[test]
    fn test_server_errors_are_not_flagged() {
        assert!(!PipelineError::Engine {
            call: "blur".into(),
            message: "corrupt image".into(),
        }
        .is_client_error());
        assert!(!PipelineError::Encoding("no encoder for format".into()).is_client_error());
    }

    #[test]
    fn test_schema_error_carries_field_detail() {
        let err = PipelineError::SchemaValidation {
            operation: "crop".into(),
            detail: "missing field `height`".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("crop"));
        assert!(msg.contains("missing field `height`"));
    }
}
