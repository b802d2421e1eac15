use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use clap_serde_derive::ClapSerde;
use tracing::{error, info, warn};

use crate::aws::{S3Stage, TranscribeClient};
use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::error::JobError;
use crate::job::client::{JobClient, ObjectStage};
use crate::job::{JobController, TranscriptionRequest};
use crate::transcript::{reconstruct, TranscriptSource};

mod aws;
mod config;
mod error;
mod job;
mod output;
mod telemetry;
mod transcript;

const DEFAULT_LANGUAGE: &str = "en-US";
const INTERRUPTED_EXIT_CODE: i32 = 130;

#[derive(Parser)]
#[command(author, version, about = "Transcribe a media file with Amazon Transcribe", long_about = None)]
struct Args {
    /// Path to the media file
    file: PathBuf,

    /// Language code of the media, e.g. pt-BR [default: en-US]
    #[arg(long)]
    lang: Option<String>,

    /// Identify the language among the configured candidates instead of
    /// using --lang; disables speaker labels
    #[arg(long)]
    multi: bool,

    /// Path to the configuration file
    #[arg(short, long, env, default_value = DEFAULT_CONFIG_FILE)]
    config_file: String,

    /// Configuration options
    #[command(flatten)]
    pub opt_config: <Config as ClapSerde>::Opt,
}

#[tokio::main]
async fn main() {
    let mut args = Args::parse();
    let config = match load_config(&args.config_file, &mut args.opt_config) {
        Ok(config) => config,
        Err(err) => exit_err!(1, "{:#}", err),
    };

    if let Err(err) = telemetry::init_telemetry(config.otlp_endpoint().as_deref()) {
        exit_err!(1, "Failed to initialize telemetry: {:#}", err);
    }

    let code = tokio::select! {
        outcome = run(&args, &config) => match outcome {
            Ok(path) => {
                println!("SUCCESS! Transcript saved to: {}", path.display());
                0
            }
            Err(err) => {
                error!("{:#}", err);
                err.downcast_ref::<JobError>().map_or(1, JobError::exit_code)
            }
        },
        _ = shutdown_signal() => {
            warn!("Interrupted, the staged media file is left in the bucket");
            INTERRUPTED_EXIT_CODE
        }
    };

    telemetry::shutdown_telemetry();
    std::process::exit(code);
}

/// Reads `config_file` and layers the command line over it. A missing file is
/// only tolerated under the default name.
fn load_config(config_file: &str, opt: &mut <Config as ClapSerde>::Opt) -> Result<Config> {
    let config = match Config::from_toml(config_file) {
        Ok(file_opt) => Config::from(file_opt).merge(opt),
        Err(_) if config_file == DEFAULT_CONFIG_FILE && !Path::new(config_file).exists() => {
            Config::from(opt)
        }
        Err(err) => return Err(err),
    };
    config.validate()?;
    Ok(config)
}

fn build_request(args: &Args, config: &Config) -> Result<TranscriptionRequest> {
    if args.multi {
        if let Some(lang) = &args.lang {
            warn!("--lang {lang} is ignored together with --multi");
        }
        TranscriptionRequest::multi_candidate(&args.file, config.language_candidates.clone())
    } else {
        TranscriptionRequest::single(&args.file, args.lang.as_deref().unwrap_or(DEFAULT_LANGUAGE))
    }
}

async fn run(args: &Args, config: &Config) -> Result<PathBuf> {
    let request = build_request(args, config)?;
    info!("--- Processing: {} ---", request.file_name());

    let sdk_config = aws::load_sdk_config(&config.region).await;
    let controller = JobController::new(
        TranscribeClient::new(&sdk_config),
        S3Stage::new(&sdk_config, &config.bucket),
        config.job_settings(),
    );
    transcribe(&controller, &request, &config.output_dir).await
}

/// Runs the job, writes the transcript under `output_dir` and only then deletes
/// the staged media file.
async fn transcribe<C: JobClient, S: ObjectStage>(
    controller: &JobController<C, S>,
    request: &TranscriptionRequest,
    output_dir: &Path,
) -> Result<PathBuf> {
    let result = controller.submit_and_await(request).await?;
    if let Some(labels) = &result.results.speaker_labels {
        info!("Speaker labels: {} speakers", labels.speakers.unwrap_or_default());
    }
    let transcript = reconstruct(&result);
    if transcript.source == TranscriptSource::Missing {
        warn!("The transcription result contained no text");
    }

    let path = output::resolve_output_path(output_dir, request.file_name())?;
    output::write_transcript(&path, &transcript.text)?;
    info!("Transcript written to {}", path.display());

    info!("Cleaning up: deleting {} from the bucket", request.file_name());
    if let Err(err) = controller.release(request).await {
        warn!("Failed to delete staged media file: {:#}", err);
    }
    Ok(path)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
