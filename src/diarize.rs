//! Speaker diarization stage.
//!
//! Diarization runs out of process: a configurable helper command (typically
//! a pyannote wrapper) receives the audio path and the credential token and
//! prints speaker turns in RTTM format on stdout. The stage is optional and
//! failure-tolerant; without a credential or a configured command the
//! pipeline simply skips it.

use crate::error::{CallscribeError, Result};
use crate::pipeline::types::SpeakerInterval;
use std::path::Path;
use std::process::Command;

/// Trait for the speaker-separation stage.
pub trait DiarizationSource: Send + Sync {
    /// Produce speaker-labeled time intervals for the audio file.
    ///
    /// `token` is the service credential (e.g., a HuggingFace token); it is
    /// always passed explicitly, never read from the environment here.
    fn diarize(&self, audio: &Path, token: Option<&str>) -> Result<Vec<SpeakerInterval>>;
}

/// Diarizer that shells out to an external helper command.
///
/// The command is invoked as `<program> <audio> [--token <token>]` and must
/// print RTTM speaker turns on stdout:
///
/// ```text
/// SPEAKER rec 1 0.50 2.30 <NA> <NA> SPEAKER_00 <NA> <NA>
/// ```
#[derive(Debug, Clone)]
pub struct CommandDiarizer {
    program: String,
}

impl CommandDiarizer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl DiarizationSource for CommandDiarizer {
    fn diarize(&self, audio: &Path, token: Option<&str>) -> Result<Vec<SpeakerInterval>> {
        let mut command = Command::new(&self.program);
        command.arg(audio);
        if let Some(token) = token {
            command.args(["--token", token]);
        }

        let output = command.output().map_err(|e| CallscribeError::Diarization {
            message: format!("Failed to run '{}': {}", self.program, e),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CallscribeError::Diarization {
                message: format!(
                    "'{}' exited with {}: {}",
                    self.program,
                    output.status,
                    stderr.trim()
                ),
            });
        }

        parse_rttm(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Parse RTTM speaker turns into intervals, sorted by start time.
///
/// Lines that are not SPEAKER records are ignored; malformed SPEAKER records
/// are an error since a half-read timeline would misattribute segments.
pub fn parse_rttm(input: &str) -> Result<Vec<SpeakerInterval>> {
    let mut intervals = Vec::new();

    for (number, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || !line.starts_with("SPEAKER") {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        // SPEAKER <file> <chan> <start> <dur> <NA> <NA> <speaker> ...
        if fields.len() < 8 {
            return Err(CallscribeError::Diarization {
                message: format!("Malformed RTTM line {}: {}", number + 1, line),
            });
        }

        let start: f64 = fields[3]
            .parse()
            .map_err(|_| CallscribeError::Diarization {
                message: format!("Invalid start time on RTTM line {}: {}", number + 1, fields[3]),
            })?;
        let duration: f64 = fields[4]
            .parse()
            .map_err(|_| CallscribeError::Diarization {
                message: format!("Invalid duration on RTTM line {}: {}", number + 1, fields[4]),
            })?;

        intervals.push(SpeakerInterval::new(
            start,
            start + duration,
            fields[7].to_string(),
        ));
    }

    intervals.sort_by(|a, b| a.start.total_cmp(&b.start));
    Ok(intervals)
}

/// Mock diarizer for testing.
#[derive(Debug, Clone, Default)]
pub struct MockDiarizer {
    intervals: Vec<SpeakerInterval>,
    should_fail: bool,
}

impl MockDiarizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the mock to return these intervals.
    pub fn with_intervals(mut self, intervals: Vec<SpeakerInterval>) -> Self {
        self.intervals = intervals;
        self
    }

    /// Configure the mock to fail on diarize.
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

impl DiarizationSource for MockDiarizer {
    fn diarize(&self, _audio: &Path, _token: Option<&str>) -> Result<Vec<SpeakerInterval>> {
        if self.should_fail {
            Err(CallscribeError::Diarization {
                message: "mock diarization failure".to_string(),
            })
        } else {
            Ok(self.intervals.clone())
        }
    }
}
