//! Alignment refinement stage.
//!
//! Refines segment timings to word-level precision so the speaker assigner
//! can vote per word instead of per segment. The stage is optional: when it
//! fails, the pipeline continues with the unrefined segment timings.

use crate::error::{CallscribeError, Result};
use crate::pipeline::types::{Segment, WordSpan};
use std::path::Path;

/// Trait for the forced-alignment stage.
pub trait AlignmentRefiner: Send + Sync {
    /// Refine segment timings, returning segments with populated `words`.
    ///
    /// Implementations may also adjust segment `start`/`end` in place.
    fn align(&self, segments: Vec<Segment>, language: &str, audio: &Path) -> Result<Vec<Segment>>;
}

/// Deterministic refiner that spreads each segment's words evenly across the
/// segment's own time span.
///
/// No acoustic model is consulted: this is the timing fallback used when a
/// real forced aligner isn't deployed. Word boundaries are approximate but
/// good enough for majority-vote speaker assignment, since votes only need
/// to land in the right diarization interval.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformAligner;

impl AlignmentRefiner for UniformAligner {
    fn align(&self, mut segments: Vec<Segment>, _language: &str, _audio: &Path) -> Result<Vec<Segment>> {
        for segment in segments.iter_mut() {
            let words: Vec<&str> = segment.text.split_whitespace().collect();
            if words.is_empty() {
                continue;
            }
            let span = (segment.end - segment.start).max(0.0);
            let step = span / words.len() as f64;
            segment.words = words
                .iter()
                .enumerate()
                .map(|(index, word)| WordSpan {
                    start: segment.start + index as f64 * step,
                    end: segment.start + (index + 1) as f64 * step,
                    word: (*word).to_string(),
                    speaker: None,
                })
                .collect();
        }
        Ok(segments)
    }
}

/// Mock refiner for testing.
#[derive(Debug, Clone, Default)]
pub struct MockAligner {
    should_fail: bool,
}

impl MockAligner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the mock to fail on align.
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

impl AlignmentRefiner for MockAligner {
    fn align(&self, segments: Vec<Segment>, language: &str, audio: &Path) -> Result<Vec<Segment>> {
        if self.should_fail {
            return Err(CallscribeError::Alignment {
                message: "mock alignment failure".to_string(),
            });
        }
        UniformAligner.align(segments, language, audio)
    }
}
