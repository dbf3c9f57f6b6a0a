//! Configuration for callscribe.
//!
//! One configuration object parameterizes the whole pipeline (model size,
//! language, diarization, device hints) instead of maintaining parallel code
//! paths per feature combination. Values come from the TOML config file,
//! overridden by environment variables, overridden by CLI arguments.

use crate::defaults;
use crate::error::{CallscribeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Whisper model size tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ModelSize {
    Tiny,
    Base,
    #[default]
    Small,
    Medium,
    Large,
}

impl ModelSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelSize::Tiny => "tiny",
            ModelSize::Base => "base",
            ModelSize::Small => "small",
            ModelSize::Medium => "medium",
            ModelSize::Large => "large",
        }
    }

    /// ggml model file name for this size, e.g. "ggml-small.bin".
    pub fn model_file_name(&self) -> String {
        format!("ggml-{}.bin", self.as_str())
    }

    /// The `model_used` tag reported in results, e.g. "whisper-small".
    pub fn model_tag(&self) -> String {
        format!("whisper-{}", self.as_str())
    }
}

impl fmt::Display for ModelSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelSize {
    type Err = CallscribeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "tiny" => Ok(ModelSize::Tiny),
            "base" => Ok(ModelSize::Base),
            "small" => Ok(ModelSize::Small),
            "medium" => Ok(ModelSize::Medium),
            "large" => Ok(ModelSize::Large),
            other => Err(CallscribeError::ConfigInvalidValue {
                key: "model_size".to_string(),
                message: format!("unknown model size '{}' (expected tiny|base|small|medium|large)", other),
            }),
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub stt: SttConfig,
    pub diarization: DiarizationConfig,
    pub runtime: RuntimeConfig,
}

/// Speech-to-text configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SttConfig {
    pub model_size: ModelSize,
    pub language: String,
    /// Override for the directory holding ggml model files.
    pub models_dir: Option<PathBuf>,
}

/// Diarization configuration.
///
/// The credential token may be stored here or passed on the command line;
/// it is never read from the environment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct DiarizationConfig {
    pub enabled: bool,
    pub hf_token: Option<String>,
    /// Helper command invoked to produce RTTM speaker turns.
    pub command: Option<String>,
}

/// Inference device and precision hints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RuntimeConfig {
    pub device: String,
    pub compute_type: String,
    pub threads: Option<usize>,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            model_size: ModelSize::default(),
            language: defaults::DEFAULT_LANGUAGE.to_string(),
            models_dir: None,
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            device: defaults::DEFAULT_DEVICE.to_string(),
            compute_type: defaults::DEFAULT_COMPUTE_TYPE.to_string(),
            threads: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// Missing fields use default values; invalid TOML is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file, or defaults if the file doesn't exist.
    ///
    /// Only a missing file falls back to defaults; invalid TOML still errors.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let config: Config = toml::from_str(&contents)?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Apply environment variable overrides.
    ///
    /// Supported variables: CALLSCRIBE_MODEL_SIZE, CALLSCRIBE_LANGUAGE,
    /// CALLSCRIBE_DEVICE. The diarization token deliberately has no
    /// environment override; secrets are passed explicitly.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(size) = std::env::var("CALLSCRIBE_MODEL_SIZE") {
            if let Ok(parsed) = size.parse::<ModelSize>() {
                self.stt.model_size = parsed;
            }
        }

        if let Ok(language) = std::env::var("CALLSCRIBE_LANGUAGE") {
            if !language.is_empty() {
                self.stt.language = language;
            }
        }

        if let Ok(device) = std::env::var("CALLSCRIBE_DEVICE") {
            if !device.is_empty() {
                self.runtime.device = device;
            }
        }

        self
    }

    /// The directory holding ggml model files.
    ///
    /// Uses the configured override when set, otherwise
    /// `~/.local/share/callscribe/models`.
    #[cfg(feature = "cli")]
    pub fn models_dir(&self) -> PathBuf {
        if let Some(dir) = &self.stt.models_dir {
            return dir.clone();
        }
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("callscribe")
            .join("models")
    }

    /// The default configuration file path.
    ///
    /// Returns ~/.config/callscribe/config.toml on Linux.
    #[cfg(feature = "cli")]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("callscribe")
            .join("config.toml")
    }
}
