//! Pipeline orchestration.
//!
//! Sequences the stages (transcribe → align → diarize → assign → merge →
//! format) under the degrade-gracefully policy: transcription and output
//! assembly are mandatory, everything in between is optional enrichment.
//! If the speech model produced text, the caller gets text — no matter how
//! much of the enrichment stack is deployed.
//!
//! Each stage runs exactly once; there are no retries. A transient scratch
//! copy of the input audio exists for the duration of one run and is removed
//! on every exit path, including unwinding.

use crate::align::AlignmentRefiner;
use crate::config::{Config, ModelSize};
use crate::diarize::DiarizationSource;
use crate::error::{CallscribeError, Result};
use crate::output::{NullReporter, ProgressReporter};
use crate::pipeline::assign::assign_speakers;
use crate::pipeline::format::format_dialogue;
use crate::pipeline::merge::merge_segments;
use crate::pipeline::roles::resolve_roles;
use crate::pipeline::types::{PipelineResult, Segment, SpeakerSummary};
use crate::stt::SegmentSource;
use std::path::Path;
use tempfile::NamedTempFile;

static NULL_REPORTER: NullReporter = NullReporter;

/// Everything one pipeline invocation needs to know.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub language: String,
    pub model_size: ModelSize,
    pub diarization_enabled: bool,
    pub hf_token: Option<String>,
    pub device: String,
    pub compute_type: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl PipelineConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            language: config.stt.language.clone(),
            model_size: config.stt.model_size,
            diarization_enabled: config.diarization.enabled,
            hf_token: config.diarization.hf_token.clone(),
            device: config.runtime.device.clone(),
            compute_type: config.runtime.compute_type.clone(),
        }
    }
}

/// Scoped scratch copy of the input audio.
///
/// The file is deleted when this guard drops, which covers success, failure,
/// and unwinding alike.
struct ScratchAudio {
    file: NamedTempFile,
}

impl ScratchAudio {
    fn create(original: &Path) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("callscribe-");
        // Keep the original extension so format-sniffing decoders work.
        let suffix = original
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()));
        if let Some(suffix) = &suffix {
            builder.suffix(suffix.as_str());
        }

        let file = builder.tempfile()?;
        std::fs::copy(original, file.path())?;
        Ok(Self { file })
    }

    fn path(&self) -> &Path {
        self.file.path()
    }
}

/// What became of the diarization stage.
enum DiarizationOutcome {
    /// Intervals were produced and speakers assigned.
    Applied,
    /// Diarization didn't run or found nothing; not an error.
    Skipped(String),
    /// The stage errored; the pipeline continues without it.
    Failed(String),
}

/// The batch transcription pipeline.
pub struct Pipeline<'a> {
    source: &'a dyn SegmentSource,
    aligner: Option<&'a dyn AlignmentRefiner>,
    diarizer: Option<&'a dyn DiarizationSource>,
    reporter: &'a dyn ProgressReporter,
    config: PipelineConfig,
}

impl<'a> Pipeline<'a> {
    pub fn new(source: &'a dyn SegmentSource, config: PipelineConfig) -> Self {
        Self {
            source,
            aligner: None,
            diarizer: None,
            reporter: &NULL_REPORTER,
            config,
        }
    }

    pub fn with_aligner(mut self, aligner: &'a dyn AlignmentRefiner) -> Self {
        self.aligner = Some(aligner);
        self
    }

    pub fn with_diarizer(mut self, diarizer: &'a dyn DiarizationSource) -> Self {
        self.diarizer = Some(diarizer);
        self
    }

    pub fn with_reporter(mut self, reporter: &'a dyn ProgressReporter) -> Self {
        self.reporter = reporter;
        self
    }

    /// Run the pipeline over one audio file.
    ///
    /// Always returns a well-formed result; fatal errors are reported inside
    /// it with `success: false` and an `error_stage` tag.
    pub fn run(&self, audio: &Path) -> PipelineResult {
        let scratch = match ScratchAudio::create(audio) {
            Ok(scratch) => scratch,
            Err(e) => {
                let error = CallscribeError::InputFile {
                    path: audio.to_string_lossy().to_string(),
                    message: e.to_string(),
                };
                return PipelineResult::failure(error.to_string(), error.stage());
            }
        };

        self.reporter.stage(&format!(
            "Модель: {} (устройство: {}, тип вычислений: {})",
            self.source.model_name(),
            self.config.device,
            self.config.compute_type
        ));

        let transcription = match self.source.transcribe(
            scratch.path(),
            &self.config.language,
            self.config.model_size,
        ) {
            Ok(transcription) => transcription,
            Err(e) => {
                return PipelineResult::failure(e.to_string(), e.stage().or(Some("transcription")));
            }
        };

        let mut segments = transcription.segments;
        self.reporter.stage(&format!(
            "Транскрипция завершена: {} сегментов",
            segments.len()
        ));

        // Optional word-level refinement; failure keeps the original timings.
        if let Some(aligner) = self.aligner {
            match aligner.align(segments.clone(), &self.config.language, scratch.path()) {
                Ok(refined) => {
                    segments = refined;
                    self.reporter.stage("Выравнивание слов завершено");
                }
                Err(e) => {
                    self.reporter
                        .warn(&format!("{}; продолжаем с исходными таймингами", e));
                }
            }
        }

        let mut result = PipelineResult::empty();
        result.text = plain_text(&segments);
        result.language = transcription
            .language
            .or_else(|| Some(self.config.language.clone()));
        result.model_used = Some(self.config.model_size.model_tag());
        result.device = Some(self.config.device.clone());
        result.duration = transcription.duration;

        let outcome = self.run_diarization(scratch.path(), &mut segments);

        // Output assembly is mandatory: any integrity failure past this
        // point fails the whole run.
        if let Err(e) = check_chronology(&segments) {
            return PipelineResult::failure(e.to_string(), e.stage());
        }

        let utterances = merge_segments(&segments);

        match outcome {
            DiarizationOutcome::Applied => {
                let summary = resolve_roles(&segments);
                result.dialogue = Some(format_dialogue(&utterances, &summary));
                result.seller_text = role_text(&segments, summary.seller.as_deref());
                result.client_text = role_text(&segments, summary.client.as_deref());
                self.reporter.stage(&format!(
                    "Диаризация завершена: {} спикеров",
                    summary.total_speakers.unwrap_or(0)
                ));
                result.speakers = Some(summary);
            }
            DiarizationOutcome::Skipped(note) => {
                result.speakers = Some(SpeakerSummary::unavailable(note));
            }
            DiarizationOutcome::Failed(message) => {
                result.speakers = Some(SpeakerSummary::failed(message));
            }
        }

        result.segments = utterances;
        self.reporter.stage(&format!(
            "Готово: {} символов текста",
            result.text.chars().count()
        ));
        result
    }

    fn run_diarization(&self, audio: &Path, segments: &mut [Segment]) -> DiarizationOutcome {
        if !self.config.diarization_enabled {
            return DiarizationOutcome::Skipped("Диаризация отключена".to_string());
        }
        let Some(diarizer) = self.diarizer else {
            return DiarizationOutcome::Skipped(
                "Диаризация недоступна: внешний бекенд не настроен".to_string(),
            );
        };

        match diarizer.diarize(audio, self.config.hf_token.as_deref()) {
            Ok(intervals) if intervals.is_empty() => {
                self.reporter.warn("Диаризация не обнаружила спикеров");
                DiarizationOutcome::Skipped("Диаризация не обнаружила спикеров".to_string())
            }
            Ok(intervals) => {
                assign_speakers(segments, &intervals);
                DiarizationOutcome::Applied
            }
            Err(e) => {
                self.reporter.warn(&e.to_string());
                DiarizationOutcome::Failed(e.to_string())
            }
        }
    }
}

/// Plain concatenation of the segment texts, the always-available output.
fn plain_text(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|segment| segment.text.trim())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Concatenated text of the segments spoken by one role's speaker id.
fn role_text(segments: &[Segment], speaker: Option<&str>) -> Option<String> {
    let speaker = speaker?;
    let text = segments
        .iter()
        .filter(|segment| segment.speaker.as_deref() == Some(speaker))
        .map(|segment| segment.text.trim())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    Some(text)
}

/// Segment starts must be non-decreasing before assembly; a scrambled
/// timeline would silently misorder the dialogue.
fn check_chronology(segments: &[Segment]) -> Result<()> {
    for window in segments.windows(2) {
        if window[1].start < window[0].start {
            return Err(CallscribeError::Assembly {
                message: format!(
                    "segments out of chronological order ({:.2}s after {:.2}s)",
                    window[1].start, window[0].start
                ),
            });
        }
    }
    Ok(())
}
