//! Result emission and progress reporting.
//!
//! The stdout/stderr split is the process contract: stdout carries exactly
//! one line of JSON (the `PipelineResult`), stderr carries all human-readable
//! narration. Nothing else may ever be written to stdout.

use crate::error::Result;
use crate::pipeline::types::PipelineResult;
use std::io::Write;

/// Serialize the result as a single JSON line.
pub fn result_line(result: &PipelineResult) -> Result<String> {
    serde_json::to_string(result)
        .map_err(|e| crate::error::CallscribeError::Assembly {
            message: format!("Failed to serialize result: {}", e),
        })
}

/// Write the result line to stdout, followed by a newline.
pub fn emit_result(result: &PipelineResult) -> Result<()> {
    let line = result_line(result)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", line)?;
    stdout.flush()?;
    Ok(())
}

/// Trait for reporting pipeline progress to the diagnostic stream.
pub trait ProgressReporter: Send + Sync {
    /// A stage progress message.
    fn stage(&self, message: &str);
    /// A non-fatal problem the pipeline recovered from.
    fn warn(&self, message: &str);
}

/// Reporter that narrates to stderr, honoring quiet mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrReporter {
    pub quiet: bool,
}

impl StderrReporter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl ProgressReporter for StderrReporter {
    fn stage(&self, message: &str) {
        if !self.quiet {
            eprintln!("{}", message);
        }
    }

    fn warn(&self, message: &str) {
        // Warnings are shown even in quiet mode; they explain missing
        // optional fields in the result.
        eprintln!("warning: {}", message);
    }
}

/// Reporter that discards everything (tests, embedding).
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl ProgressReporter for NullReporter {
    fn stage(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
}
