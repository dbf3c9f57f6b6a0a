//! The transcription/diarization pipeline.
//!
//! Leaf-first: `types` carries the data model, `assign`/`roles`/`merge`/
//! `format` are the pure reconciliation stages, and `orchestrator` sequences
//! them with the degrade-gracefully policy.

pub mod assign;
pub mod format;
pub mod merge;
pub mod orchestrator;
pub mod roles;
pub mod types;

pub use orchestrator::{Pipeline, PipelineConfig};
pub use types::{PipelineResult, Segment, SpeakerInterval, SpeakerSummary, Utterance, WordSpan};
