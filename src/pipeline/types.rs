//! Data types flowing through the transcription pipeline.
//!
//! All entities live for a single pipeline invocation. `PipelineResult` is
//! the only externally observable artifact; it is serialized as one JSON
//! line on stdout and never mutated after the orchestrator returns it.

use serde::Serialize;

/// A timed span of recognized text from the speech-recognition stage.
///
/// `speaker` stays unset until the speaker assigner runs. `words` is empty
/// until the alignment refiner produces word-level timings.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub text: String,
    pub speaker: Option<String>,
    pub words: Vec<WordSpan>,
}

impl Segment {
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
            speaker: None,
            words: Vec::new(),
        }
    }

    /// Builder-style speaker attachment, mostly for tests.
    pub fn with_speaker(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = Some(speaker.into());
        self
    }
}

/// A single word with refined timing, produced by the alignment refiner.
#[derive(Debug, Clone, PartialEq)]
pub struct WordSpan {
    pub start: f64,
    pub end: f64,
    pub word: String,
    pub speaker: Option<String>,
}

/// A timed span attributed to one distinct voice by the diarization stage.
///
/// The time base is independent of segment boundaries; intervals may overlap
/// zero or more segments.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeakerInterval {
    pub start: f64,
    pub end: f64,
    pub speaker: String,
}

impl SpeakerInterval {
    pub fn new(start: f64, end: f64, speaker: impl Into<String>) -> Self {
        Self {
            start,
            end,
            speaker: speaker.into(),
        }
    }
}

/// A merged run of consecutive same-speaker segments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Utterance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    pub text: String,
    pub start: f64,
    pub end: f64,
}

/// Speaker role information for the calling process.
///
/// Field names are part of the JSON contract: `seller` is the first distinct
/// speaker by appearance, `client` the second. `note` carries human-readable
/// context for the degenerate cases (no speakers, one speaker, diarization
/// unavailable), `error` the reason when diarization itself failed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpeakerSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_speakers: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub all_speakers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SpeakerSummary {
    /// Summary for runs where diarization was skipped or returned nothing.
    pub fn unavailable(note: impl Into<String>) -> Self {
        Self {
            note: Some(note.into()),
            ..Self::default()
        }
    }

    /// Summary for runs where the diarization stage itself failed.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

/// The single structured result of one pipeline invocation.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub success: bool,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialogue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speakers: Option<SpeakerSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub segments: Vec<Utterance>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_used: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_stage: Option<String>,
}

impl PipelineResult {
    /// An empty successful result, filled in by the orchestrator.
    pub fn empty() -> Self {
        Self {
            success: true,
            text: String::new(),
            dialogue: None,
            seller_text: None,
            client_text: None,
            speakers: None,
            segments: Vec::new(),
            language: None,
            model_used: None,
            device: None,
            duration: None,
            error: None,
            error_stage: None,
        }
    }

    /// A failed result carrying the error message and the stage tag.
    pub fn failure(error: impl Into<String>, stage: Option<&str>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            error_stage: stage.map(str::to_string),
            ..Self::empty()
        }
    }
}
