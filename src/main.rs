use anyhow::Result;
use callscribe::align::UniformAligner;
use callscribe::cli::Cli;
use callscribe::config::Config;
use callscribe::diarize::CommandDiarizer;
use callscribe::error::CallscribeError;
use callscribe::output::{StderrReporter, emit_result};
use callscribe::pipeline::types::PipelineResult;
use callscribe::pipeline::{Pipeline, PipelineConfig};
use callscribe::stt::{WhisperConfig, WhisperSource};
use clap::Parser;
use owo_colors::OwoColorize;
use std::path::PathBuf;

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return on_argument_error(e),
    };

    let config = load_config(cli.config.as_deref())?;

    // Unreadable input fails before the pipeline: error JSON on stdout,
    // exit code 1. Everything after this point exits 0 and reports through
    // the result object.
    if let Err(e) = std::fs::File::open(&cli.audio) {
        let error = CallscribeError::InputFile {
            path: cli.audio.to_string_lossy().to_string(),
            message: e.to_string(),
        };
        eprintln!("{}", format!("Ошибка: {}", error).red());
        emit_result(&PipelineResult::failure(error.to_string(), error.stage()))?;
        std::process::exit(1);
    }

    let hf_token = cli.hf_token.clone().or(config.diarization.hf_token.clone());
    let pipeline_config = PipelineConfig {
        language: cli
            .language
            .clone()
            .unwrap_or_else(|| config.stt.language.clone()),
        model_size: cli.model_size.unwrap_or(config.stt.model_size),
        diarization_enabled: !cli.no_diarization
            && (hf_token.is_some() || config.diarization.enabled),
        hf_token,
        device: config.runtime.device.clone(),
        compute_type: config.runtime.compute_type.clone(),
    };

    let reporter = StderrReporter::new(cli.quiet);
    if cli.verbose >= 1 {
        eprintln!(
            "  {} {}",
            "Версия:".dimmed(),
            callscribe::version_string()
        );
        eprintln!(
            "  {} {} — {}",
            "Бекенд:".dimmed(),
            callscribe::defaults::gpu_backend(),
            pipeline_config.device
        );
        eprintln!("  {} {}", "Файл:".dimmed(), cli.audio.display());
    }

    let model_path = cli.model_path.clone().unwrap_or_else(|| {
        config
            .models_dir()
            .join(pipeline_config.model_size.model_file_name())
    });
    let source = match WhisperSource::new(WhisperConfig {
        model_path,
        threads: config.runtime.threads,
    }) {
        Ok(source) => source,
        Err(e) => {
            // Model problems are a transcription-stage failure, not an
            // argument error: the contract is still one result line, exit 0.
            eprintln!("{}", format!("Ошибка: {}", e).red());
            emit_result(&PipelineResult::failure(e.to_string(), e.stage()))?;
            return Ok(());
        }
    };

    let aligner = UniformAligner;
    let diarizer = config
        .diarization
        .command
        .as_deref()
        .map(CommandDiarizer::new);

    let mut pipeline = Pipeline::new(&source, pipeline_config)
        .with_aligner(&aligner)
        .with_reporter(&reporter);
    if let Some(diarizer) = &diarizer {
        pipeline = pipeline.with_diarizer(diarizer);
    }

    let result = pipeline.run(&cli.audio);
    if let Some(error) = &result.error {
        eprintln!("{}", format!("Ошибка: {}", error).red());
    }
    emit_result(&result)?;
    Ok(())
}

/// Report an argument-validation failure.
///
/// Same contract as an unreadable input: the human-readable diagnostic goes
/// to stderr, stdout gets a result object with `success: false`, and the
/// process exits 1. `--help` and `--version` keep clap's normal behavior.
fn on_argument_error(error: clap::Error) -> Result<()> {
    use clap::error::ErrorKind;
    if matches!(
        error.kind(),
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
    ) {
        error.exit();
    }

    eprintln!("{}", error.render());
    emit_result(&PipelineResult::failure(error.to_string(), None))?;
    std::process::exit(1);
}

/// Load configuration from file or use defaults.
///
/// Priority order:
/// 1. Custom config path from CLI (--config)
/// 2. Default config path (~/.config/callscribe/config.toml)
/// 3. Built-in defaults
///
/// Environment variable overrides apply on top in all cases.
fn load_config(custom_path: Option<&std::path::Path>) -> Result<Config> {
    let config = if let Some(path) = custom_path {
        Config::load(path)?
    } else {
        let default_path: PathBuf = Config::default_path();
        Config::load_or_default(&default_path)?
    };

    Ok(config.with_env_overrides())
}
