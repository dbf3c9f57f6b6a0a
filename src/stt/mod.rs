//! Speech-to-text stage: the segment source trait and its implementations.

pub mod source;
pub mod whisper;

pub use source::{MockSegmentSource, SegmentSource, Transcription};
pub use whisper::{WhisperConfig, WhisperSource};
