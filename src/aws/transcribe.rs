use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_transcribe::error::DisplayErrorContext;
use aws_sdk_transcribe::types::{
    LanguageCode, Media, MediaFormat, Settings, TranscriptionJobStatus,
};
use aws_sdk_transcribe::Client;
use tracing::warn;

use crate::job::client::{JobClient, JobSpec, JobState, JobStatus, LanguageParams};

/// Amazon Transcribe batch jobs; result documents are fetched over HTTPS.
pub struct TranscribeClient {
    client: Client,
    http: reqwest::Client,
}

impl TranscribeClient {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: Client::new(sdk_config),
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl JobClient for TranscribeClient {
    #[tracing::instrument(level = "info", skip_all, fields(job = spec.job_name.as_str()))]
    async fn start(&self, spec: &JobSpec) -> Result<()> {
        let request = self
            .client
            .start_transcription_job()
            .transcription_job_name(&spec.job_name)
            .media(Media::builder().media_file_uri(&spec.media_uri).build())
            .media_format(MediaFormat::from(spec.media_format.as_str()));

        let request = match &spec.language {
            LanguageParams::Single {
                code,
                show_speaker_labels,
                max_speaker_labels,
            } => {
                let settings = if *show_speaker_labels {
                    Settings::builder()
                        .show_speaker_labels(true)
                        .max_speaker_labels(
                            i32::try_from(*max_speaker_labels)
                                .context("Speaker label limit out of range")?,
                        )
                        .build()
                } else {
                    Settings::builder().show_speaker_labels(false).build()
                };
                request
                    .language_code(LanguageCode::from(code.as_str()))
                    .settings(settings)
            }
            LanguageParams::IdentifyMultiple { options } => request
                .identify_multiple_languages(true)
                .set_language_options(Some(
                    options
                        .iter()
                        .map(|code| LanguageCode::from(code.as_str()))
                        .collect(),
                ))
                .settings(Settings::builder().show_speaker_labels(false).build()),
        };

        request
            .send()
            .await
            .map_err(|err| anyhow!("{}", DisplayErrorContext(&err)))?;
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn status(&self, job_name: &str) -> Result<JobState> {
        let output = self
            .client
            .get_transcription_job()
            .transcription_job_name(job_name)
            .send()
            .await
            .map_err(|err| anyhow!("{}", DisplayErrorContext(&err)))?;
        let job = output
            .transcription_job()
            .ok_or_else(|| anyhow!("Job {job_name} missing from status response"))?;

        Ok(JobState {
            status: job_status(job.transcription_job_status()),
            result_uri: job
                .transcript()
                .and_then(|transcript| transcript.transcript_file_uri())
                .map(str::to_string),
            failure_reason: job.failure_reason().map(str::to_string),
        })
    }

    #[tracing::instrument(level = "info", skip_all)]
    async fn fetch_result(&self, result_uri: &str) -> Result<String> {
        let body = self
            .http
            .get(result_uri)
            .send()
            .await
            .context("Failed to request result document")?
            .error_for_status()
            .context("Result document request was refused")?
            .text()
            .await
            .context("Failed to read result document")?;
        Ok(body)
    }
}

fn job_status(status: Option<&TranscriptionJobStatus>) -> JobStatus {
    match status {
        Some(TranscriptionJobStatus::Completed) => JobStatus::Completed,
        Some(TranscriptionJobStatus::Failed) => JobStatus::Failed,
        Some(TranscriptionJobStatus::InProgress | TranscriptionJobStatus::Queued) => {
            JobStatus::InProgress
        }
        other => {
            warn!("Unrecognized job status {other:?}, treating as in progress");
            JobStatus::InProgress
        }
    }
}
