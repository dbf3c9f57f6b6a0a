//! Segment source trait and test double.

use crate::config::ModelSize;
use crate::error::{CallscribeError, Result};
use crate::pipeline::types::Segment;
use std::path::Path;
use std::sync::Arc;

/// What the speech-recognition stage hands back: the ordered segments plus
/// whatever run metadata the model reports.
#[derive(Debug, Clone, Default)]
pub struct Transcription {
    pub segments: Vec<Segment>,
    /// Language the model detected (or was forced to).
    pub language: Option<String>,
    /// Audio duration in seconds, when the decoder reports it.
    pub duration: Option<f64>,
}

/// Trait for the speech-recognition stage.
///
/// This trait allows swapping implementations (real Whisper vs mock).
pub trait SegmentSource: Send + Sync {
    /// Transcribe an audio file into ordered, timed segments.
    ///
    /// # Arguments
    /// * `audio` - Path to the audio file (the pipeline's scratch copy)
    /// * `language` - Language code to force, e.g. "ru"
    /// * `model_size` - Whisper model size tag
    fn transcribe(&self, audio: &Path, language: &str, model_size: ModelSize)
    -> Result<Transcription>;

    /// Name of the loaded model, e.g. "whisper-small".
    fn model_name(&self) -> String;
}

/// Implement SegmentSource for Arc<T> to allow sharing.
impl<T: SegmentSource> SegmentSource for Arc<T> {
    fn transcribe(
        &self,
        audio: &Path,
        language: &str,
        model_size: ModelSize,
    ) -> Result<Transcription> {
        (**self).transcribe(audio, language, model_size)
    }

    fn model_name(&self) -> String {
        (**self).model_name()
    }
}

/// Mock segment source for testing.
#[derive(Debug, Clone, Default)]
pub struct MockSegmentSource {
    segments: Vec<Segment>,
    language: Option<String>,
    duration: Option<f64>,
    should_fail: bool,
}

impl MockSegmentSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the mock to return these segments.
    pub fn with_segments(mut self, segments: Vec<Segment>) -> Self {
        self.segments = segments;
        self
    }

    /// Configure the reported detected language.
    pub fn with_language(mut self, language: &str) -> Self {
        self.language = Some(language.to_string());
        self
    }

    /// Configure the reported audio duration.
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Configure the mock to fail on transcribe.
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

impl SegmentSource for MockSegmentSource {
    fn transcribe(
        &self,
        _audio: &Path,
        _language: &str,
        _model_size: ModelSize,
    ) -> Result<Transcription> {
        if self.should_fail {
            Err(CallscribeError::Transcription {
                message: "mock transcription failure".to_string(),
            })
        } else {
            Ok(Transcription {
                segments: self.segments.clone(),
                language: self.language.clone(),
                duration: self.duration,
            })
        }
    }

    fn model_name(&self) -> String {
        "mock".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn mock_returns_configured_segments() {
        let source = MockSegmentSource::new()
            .with_segments(vec![Segment::new(0.0, 1.0, "привет")])
            .with_language("ru")
            .with_duration(1.0);

        let result = source
            .transcribe(&PathBuf::from("x.wav"), "ru", ModelSize::Small)
            .unwrap();
        assert_eq!(result.segments.len(), 1);
        assert_eq!(result.language.as_deref(), Some("ru"));
        assert_eq!(result.duration, Some(1.0));
    }

    #[test]
    fn mock_fails_when_configured() {
        let source = MockSegmentSource::new().with_failure();
        let result = source.transcribe(&PathBuf::from("x.wav"), "ru", ModelSize::Small);

        match result {
            Err(CallscribeError::Transcription { message }) => {
                assert_eq!(message, "mock transcription failure");
            }
            other => panic!("Expected Transcription error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn source_trait_is_object_safe() {
        let source: Box<dyn SegmentSource> =
            Box::new(MockSegmentSource::new().with_segments(vec![Segment::new(0.0, 1.0, "a")]));
        assert_eq!(source.model_name(), "mock");
        let result = source
            .transcribe(&PathBuf::from("x.wav"), "ru", ModelSize::Small)
            .unwrap();
        assert_eq!(result.segments[0].text, "a");
    }
}
