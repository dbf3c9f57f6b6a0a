//! Command-line interface for callscribe
//!
//! Provides argument parsing using clap derive macros. The positional
//! argument order (audio, language, model size, token) matches the calling
//! convention of the services this tool replaces, so existing wrappers keep
//! working.

use crate::config::ModelSize;
use clap::Parser;
use std::path::PathBuf;

/// Batch call transcription with speaker diarization
#[derive(Parser, Debug)]
#[command(
    name = "callscribe",
    version,
    about = "Transcribe a recorded call into role-labeled dialogue JSON"
)]
pub struct Cli {
    /// Path to the audio file to transcribe
    pub audio: PathBuf,

    /// Language code for transcription (default: ru)
    pub language: Option<String>,

    /// Whisper model size
    #[arg(value_enum)]
    pub model_size: Option<ModelSize>,

    /// HuggingFace token enabling speaker diarization
    pub hf_token: Option<String>,

    /// Disable speaker diarization even when a token is available
    #[arg(long)]
    pub no_diarization: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Path to the ggml model file (overrides the models directory lookup)
    #[arg(long, value_name = "PATH")]
    pub model_path: Option<PathBuf>,

    /// Suppress progress narration on stderr
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose output (-v: stage progress, -vv: full diagnostics)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_invocation() {
        let cli = Cli::parse_from(["callscribe", "call.m4a"]);
        assert_eq!(cli.audio, PathBuf::from("call.m4a"));
        assert_eq!(cli.language, None);
        assert_eq!(cli.model_size, None);
        assert_eq!(cli.hf_token, None);
        assert!(!cli.no_diarization);
    }

    #[test]
    fn parses_full_positional_contract() {
        let cli = Cli::parse_from(["callscribe", "call.m4a", "en", "medium", "hf_abc"]);
        assert_eq!(cli.language.as_deref(), Some("en"));
        assert_eq!(cli.model_size, Some(ModelSize::Medium));
        assert_eq!(cli.hf_token.as_deref(), Some("hf_abc"));
    }

    #[test]
    fn rejects_unknown_model_size() {
        let result = Cli::try_parse_from(["callscribe", "call.m4a", "ru", "enormous"]);
        assert!(result.is_err());
    }

    #[test]
    fn requires_audio_argument() {
        assert!(Cli::try_parse_from(["callscribe"]).is_err());
    }

    #[test]
    fn parses_flags() {
        let cli = Cli::parse_from([
            "callscribe",
            "call.m4a",
            "--no-diarization",
            "--quiet",
            "-vv",
        ]);
        assert!(cli.no_diarization);
        assert!(cli.quiet);
        assert_eq!(cli.verbose, 2);
    }
}
