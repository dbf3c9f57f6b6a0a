//! Error types for callscribe.
//!
//! The variants follow the pipeline's failure policy: transcription and
//! assembly errors are fatal for the whole run, while alignment,
//! diarization, and speaker-assignment errors are recovered at the stage
//! boundary and the pipeline degrades to plain text.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CallscribeError {
    // Pre-pipeline errors
    #[error("Failed to read audio file {path}: {message}")]
    InputFile { path: String, message: String },

    // Transcription stage (fatal)
    #[error("Transcription model not found at {path}")]
    ModelNotFound { path: String },

    #[error("Transcription failed: {message}")]
    Transcription { message: String },

    // Enrichment stages (recovered by the orchestrator)
    #[error("Word alignment failed: {message}")]
    Alignment { message: String },

    #[error("Speaker diarization failed: {message}")]
    Diarization { message: String },

    #[error("Speaker assignment failed: {message}")]
    SpeakerAssignment { message: String },

    // Output assembly (fatal)
    #[error("Result assembly failed: {message}")]
    Assembly { message: String },

    // Configuration errors
    #[error("Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

impl CallscribeError {
    /// The `error_stage` tag written into a failed `PipelineResult`.
    ///
    /// Returns `None` for errors that occur outside a pipeline stage
    /// (configuration, generic I/O).
    pub fn stage(&self) -> Option<&'static str> {
        match self {
            CallscribeError::InputFile { .. } => Some("input"),
            CallscribeError::ModelNotFound { .. } | CallscribeError::Transcription { .. } => {
                Some("transcription")
            }
            CallscribeError::Alignment { .. } => Some("alignment"),
            CallscribeError::Diarization { .. } => Some("diarization"),
            CallscribeError::SpeakerAssignment { .. } => Some("speaker_assignment"),
            CallscribeError::Assembly { .. } => Some("assembly"),
            _ => None,
        }
    }

    /// Whether this error aborts the whole run.
    ///
    /// Enrichment-stage errors are recoverable: the pipeline continues and
    /// returns plain text without the corresponding optional fields.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            CallscribeError::Alignment { .. }
                | CallscribeError::Diarization { .. }
                | CallscribeError::SpeakerAssignment { .. }
        )
    }
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, CallscribeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_input_file_display() {
        let error = CallscribeError::InputFile {
            path: "/calls/rec.m4a".to_string(),
            message: "No such file or directory".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to read audio file /calls/rec.m4a: No such file or directory"
        );
    }

    #[test]
    fn test_model_not_found_display() {
        let error = CallscribeError::ModelNotFound {
            path: "/models/ggml-small.bin".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Transcription model not found at /models/ggml-small.bin"
        );
    }

    #[test]
    fn test_transcription_display() {
        let error = CallscribeError::Transcription {
            message: "out of memory".to_string(),
        };
        assert_eq!(error.to_string(), "Transcription failed: out of memory");
    }

    #[test]
    fn test_diarization_display() {
        let error = CallscribeError::Diarization {
            message: "credential rejected".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Speaker diarization failed: credential rejected"
        );
    }

    #[test]
    fn test_stage_tags() {
        let cases: Vec<(CallscribeError, Option<&str>)> = vec![
            (
                CallscribeError::InputFile {
                    path: "x".into(),
                    message: "y".into(),
                },
                Some("input"),
            ),
            (
                CallscribeError::Transcription { message: "m".into() },
                Some("transcription"),
            ),
            (
                CallscribeError::ModelNotFound { path: "p".into() },
                Some("transcription"),
            ),
            (
                CallscribeError::Alignment { message: "m".into() },
                Some("alignment"),
            ),
            (
                CallscribeError::Diarization { message: "m".into() },
                Some("diarization"),
            ),
            (
                CallscribeError::SpeakerAssignment { message: "m".into() },
                Some("speaker_assignment"),
            ),
            (
                CallscribeError::Assembly { message: "m".into() },
                Some("assembly"),
            ),
            (CallscribeError::Other("m".into()), None),
        ];
        for (error, expected) in cases {
            assert_eq!(error.stage(), expected, "stage mismatch for {:?}", error);
        }
    }

    #[test]
    fn test_fatality_policy() {
        assert!(
            CallscribeError::Transcription {
                message: "m".into()
            }
            .is_fatal()
        );
        assert!(
            CallscribeError::Assembly {
                message: "m".into()
            }
            .is_fatal()
        );
        assert!(
            !CallscribeError::Alignment {
                message: "m".into()
            }
            .is_fatal()
        );
        assert!(
            !CallscribeError::Diarization {
                message: "m".into()
            }
            .is_fatal()
        );
        assert!(
            !CallscribeError::SpeakerAssignment {
                message: "m".into()
            }
            .is_fatal()
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: CallscribeError = io_error.into();
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_toml_error() {
        let toml_str = "invalid = toml = syntax";
        let toml_error = toml::from_str::<toml::Value>(toml_str).unwrap_err();
        let error: CallscribeError = toml_error.into();
        assert!(error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<CallscribeError>();
        assert_sync::<CallscribeError>();
    }
}
