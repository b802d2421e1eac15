use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap_serde_derive::ClapSerde;

pub const DEFAULT_CONFIG_FILE: &str = "Transcriber.toml";

/// Highest speaker count the transcription service accepts.
pub const MAX_SPEAKER_LABELS: u32 = 10;

#[derive(ClapSerde, Debug, Clone)]
pub struct Config {
    /// Bucket the media file is staged in while the job runs
    #[default("media-transcriber-staging".to_string())]
    #[arg(long, env = "TRANSCRIBE_BUCKET")]
    pub(crate) bucket: String,

    /// AWS region of the bucket and the transcription service
    #[default("us-east-2".to_string())]
    #[arg(long, env = "TRANSCRIBE_REGION")]
    pub(crate) region: String,

    /// Directory transcripts are written to
    #[default(PathBuf::from("transcripts"))]
    #[arg(long)]
    pub(crate) output_dir: PathBuf,

    /// Candidate locales for automatic language identification
    #[default(vec!["en-US".to_string(), "es-US".to_string(), "pt-BR".to_string()])]
    #[arg(skip)]
    pub(crate) language_candidates: Vec<String>,

    /// Upper bound on distinct speakers when speaker labels are requested
    #[default(MAX_SPEAKER_LABELS)]
    #[arg(skip)]
    pub(crate) max_speaker_labels: u32,

    /// Seconds between two status checks
    #[default(5)]
    #[arg(skip)]
    pub(crate) poll_interval_secs: u64,

    /// Seconds to wait for a terminal job status, 0 waits forever
    #[default(14400)]
    #[arg(long)]
    pub(crate) max_wait_secs: u64,

    /// Media format used when the file extension is not recognized
    #[default("mp4".to_string())]
    #[arg(long)]
    pub(crate) media_format: String,

    /// OTLP collector endpoint for trace export, empty disables export
    #[default(String::new())]
    #[arg(long, env = "OTLP_ENDPOINT")]
    pub(crate) otlp_endpoint: String,
}

impl Config {
    pub fn from_toml(path: &str) -> Result<<Config as ClapSerde>::Opt> {
        let str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {path}"))?;
        let opt = toml::from_str(&str)
            .with_context(|| format!("Failed to parse configuration file {path}"))?;
        Ok(opt)
    }

    /// Rejects deploy-time values the service or the poll loop cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.language_candidates.is_empty() {
            bail!("language_candidates must name at least one locale");
        }
        if self.language_candidates.iter().any(|code| code.trim().is_empty()) {
            bail!("language_candidates contains an empty locale");
        }
        if !(1..=MAX_SPEAKER_LABELS).contains(&self.max_speaker_labels) {
            bail!(
                "max_speaker_labels must be between 1 and {MAX_SPEAKER_LABELS}, got {}",
                self.max_speaker_labels
            );
        }
        if self.poll_interval_secs == 0 {
            bail!("poll_interval_secs must be at least 1");
        }
        Ok(())
    }

    pub fn otlp_endpoint(&self) -> Option<String> {
        let endpoint = self.otlp_endpoint.trim();
        (!endpoint.is_empty()).then(|| endpoint.to_string())
    }

    pub fn job_settings(&self) -> JobSettings {
        JobSettings {
            bucket: self.bucket.clone(),
            max_speaker_labels: self.max_speaker_labels,
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            max_wait: (self.max_wait_secs > 0).then(|| Duration::from_secs(self.max_wait_secs)),
            fallback_media_format: self.media_format.clone(),
        }
    }
}

/// Fixed parameters the job controller is constructed with.
#[derive(Debug, Clone)]
pub struct JobSettings {
    pub bucket: String,
    pub max_speaker_labels: u32,
    pub poll_interval: Duration,
    pub max_wait: Option<Duration>,
    pub fallback_media_format: String,
}
