//! callscribe - batch call transcription with speaker diarization
//!
//! One invocation per audio file: transcribe, optionally refine word
//! timings, optionally diarize, reconcile speakers into role-labeled
//! dialogue, and emit a single JSON result line.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod align;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod defaults;
pub mod diarize;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod stt;

// Collaborator traits (source → enrich → assemble)
pub use align::{AlignmentRefiner, MockAligner, UniformAligner};
pub use diarize::{CommandDiarizer, DiarizationSource, MockDiarizer};
pub use stt::{MockSegmentSource, SegmentSource, Transcription};

// Pipeline
pub use pipeline::{Pipeline, PipelineConfig, PipelineResult};

// Error handling
pub use error::{CallscribeError, Result};

// Config
pub use config::{Config, ModelSize};

// Output contract
pub use output::{NullReporter, ProgressReporter, StderrReporter, emit_result};

/// Build version string with optional git commit hash.
///
/// Returns `"0.3.0+abc1234"` when git hash is available, `"0.3.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
