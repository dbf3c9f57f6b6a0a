//! Whisper-based segment source.
//!
//! Implements [`SegmentSource`] on top of whisper-rs. The context is loaded
//! once per process and wrapped in a Mutex; each transcription creates its
//! own decoding state.
//!
//! # Feature Gate
//!
//! Requires the `whisper` feature and cmake at build time:
//!
//! ```bash
//! cargo build --features whisper
//! ```

use crate::config::ModelSize;
use crate::error::{CallscribeError, Result};
use crate::stt::source::{SegmentSource, Transcription};
use std::path::{Path, PathBuf};

#[cfg(feature = "whisper")]
use crate::pipeline::types::Segment;
#[cfg(feature = "whisper")]
use std::sync::{Mutex, Once};
#[cfg(feature = "whisper")]
use whisper_rs::{
    FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters, install_logging_hooks,
};

#[cfg(feature = "whisper")]
static LOGGING_HOOKS_INSTALLED: Once = Once::new();

/// Configuration for the Whisper segment source.
#[derive(Debug, Clone)]
pub struct WhisperConfig {
    /// Path to the ggml model file
    pub model_path: PathBuf,
    /// Number of threads for inference (None = auto-detect)
    pub threads: Option<usize>,
}

/// Whisper segment source.
///
/// # Feature Gate
///
/// The real implementation is only available with the `whisper` feature;
/// without it a stub is compiled that fails at transcribe time.
#[cfg(feature = "whisper")]
pub struct WhisperSource {
    context: Mutex<WhisperContext>,
    config: WhisperConfig,
    model_name: String,
}

#[cfg(feature = "whisper")]
impl std::fmt::Debug for WhisperSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperSource")
            .field("config", &self.config)
            .field("model_name", &self.model_name)
            .field("context", &"<WhisperContext>")
            .finish()
    }
}

/// Whisper segment source placeholder (without the whisper feature).
#[cfg(not(feature = "whisper"))]
#[derive(Debug)]
pub struct WhisperSource {
    config: WhisperConfig,
    model_name: String,
}

fn model_name_from_path(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string()
}

#[cfg(feature = "whisper")]
impl WhisperSource {
    /// Load the Whisper model.
    ///
    /// # Errors
    /// Returns `CallscribeError::ModelNotFound` if the model file doesn't exist,
    /// `CallscribeError::Transcription` if model loading fails.
    pub fn new(config: WhisperConfig) -> Result<Self> {
        // Install logging hooks to suppress whisper.cpp output (only once)
        LOGGING_HOOKS_INSTALLED.call_once(|| {
            install_logging_hooks();
        });

        if !config.model_path.exists() {
            return Err(CallscribeError::ModelNotFound {
                path: config.model_path.to_string_lossy().to_string(),
            });
        }

        let model_name = model_name_from_path(&config.model_path);

        let mut context_params = WhisperContextParameters::default();
        context_params.flash_attn(true);
        let context = WhisperContext::new_with_params(
            config
                .model_path
                .to_str()
                .ok_or_else(|| CallscribeError::Transcription {
                    message: "Invalid UTF-8 in model path".to_string(),
                })?,
            context_params,
        )
        .map_err(|e| CallscribeError::Transcription {
            message: format!("Failed to load Whisper model: {}", e),
        })?;

        Ok(Self {
            context: Mutex::new(context),
            config,
            model_name,
        })
    }

    pub fn config(&self) -> &WhisperConfig {
        &self.config
    }

    /// Read a 16kHz mono WAV file into f32 samples normalized to [-1.0, 1.0].
    fn load_audio(path: &Path) -> Result<Vec<f32>> {
        let reader = hound::WavReader::open(path).map_err(|e| CallscribeError::Transcription {
            message: format!("Failed to read audio: {}", e),
        })?;
        let spec = reader.spec();
        if spec.sample_rate != crate::defaults::SAMPLE_RATE || spec.channels != 1 {
            return Err(CallscribeError::Transcription {
                message: format!(
                    "Expected {}Hz mono WAV, got {}Hz {}ch",
                    crate::defaults::SAMPLE_RATE,
                    spec.sample_rate,
                    spec.channels
                ),
            });
        }

        let samples: std::result::Result<Vec<i16>, _> = reader.into_samples::<i16>().collect();
        let samples = samples.map_err(|e| CallscribeError::Transcription {
            message: format!("Failed to decode audio samples: {}", e),
        })?;
        Ok(samples.iter().map(|&s| s as f32 / 32768.0).collect())
    }
}

#[cfg(not(feature = "whisper"))]
impl WhisperSource {
    /// Create a stub source (whisper feature disabled).
    ///
    /// Still validates the model path so configuration errors surface early.
    pub fn new(config: WhisperConfig) -> Result<Self> {
        if !config.model_path.exists() {
            return Err(CallscribeError::ModelNotFound {
                path: config.model_path.to_string_lossy().to_string(),
            });
        }
        let model_name = model_name_from_path(&config.model_path);
        Ok(Self { config, model_name })
    }

    pub fn config(&self) -> &WhisperConfig {
        &self.config
    }
}

#[cfg(feature = "whisper")]
impl SegmentSource for WhisperSource {
    fn transcribe(
        &self,
        audio: &Path,
        language: &str,
        _model_size: ModelSize,
    ) -> Result<Transcription> {
        let samples = Self::load_audio(audio)?;

        let context = self
            .context
            .lock()
            .map_err(|e| CallscribeError::Transcription {
                message: format!("Failed to acquire context lock: {}", e),
            })?;

        let mut state = context
            .create_state()
            .map_err(|e| CallscribeError::Transcription {
                message: format!("Failed to create Whisper state: {}", e),
            })?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(Some(language));
        if let Some(threads) = self.config.threads {
            params.set_n_threads(threads as i32);
        }
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        state
            .full(params, &samples)
            .map_err(|e| CallscribeError::Transcription {
                message: format!("Whisper inference failed: {}", e),
            })?;

        let lang_id = state.full_lang_id_from_state();
        let detected = whisper_rs::get_lang_str(lang_id).unwrap_or("").to_string();

        // Timestamps come back in centiseconds.
        let mut segments = Vec::new();
        for segment in state.as_iter() {
            let text = segment.to_string();
            if text.trim().is_empty() {
                continue;
            }
            segments.push(Segment::new(
                segment.start_timestamp() as f64 / 100.0,
                segment.end_timestamp() as f64 / 100.0,
                text,
            ));
        }

        let duration = Some(samples.len() as f64 / crate::defaults::SAMPLE_RATE as f64);

        Ok(Transcription {
            segments,
            language: if detected.is_empty() {
                Some(language.to_string())
            } else {
                Some(detected)
            },
            duration,
        })
    }

    fn model_name(&self) -> String {
        self.model_name.clone()
    }
}

#[cfg(not(feature = "whisper"))]
impl SegmentSource for WhisperSource {
    fn transcribe(
        &self,
        _audio: &Path,
        _language: &str,
        _model_size: ModelSize,
    ) -> Result<Transcription> {
        Err(CallscribeError::Transcription {
            message: concat!(
                "Whisper feature not enabled. This binary was built without speech recognition.\n",
                "To fix: cargo build --release --features whisper\n",
                "If build fails with cmake errors, install: sudo apt install cmake"
            )
            .to_string(),
        })
    }

    fn model_name(&self) -> String {
        self.model_name.clone()
    }
}
