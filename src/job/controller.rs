use std::time::SystemTime;

use anyhow::Result;
use tracing::{debug, info};

use crate::config::JobSettings;
use crate::error::{JobError, JobResult};
use crate::job::client::{JobClient, JobSpec, JobState, JobStatus, LanguageParams, ObjectStage};
use crate::job::request::{JobHandle, LanguageMode, TranscriptionRequest};
use crate::transcript::TranscriptionResult;

/// Drives one transcription job from staging the media file to the parsed
/// result document.
pub struct JobController<C, S> {
    client: C,
    stage: S,
    settings: JobSettings,
}

impl<C: JobClient, S: ObjectStage> JobController<C, S> {
    pub fn new(client: C, stage: S, settings: JobSettings) -> Self {
        Self {
            client,
            stage,
            settings,
        }
    }

    /// Stages the source file, submits the job and polls it to a terminal
    /// status.
    ///
    /// The staged object is left in place on every outcome; call
    /// [`JobController::release`] once the transcript is persisted.
    #[tracing::instrument(level = "info", skip_all, fields(file = request.file_name()))]
    pub async fn submit_and_await(
        &self,
        request: &TranscriptionRequest,
    ) -> JobResult<TranscriptionResult> {
        info!("Uploading {} to bucket {}", request.file_name(), self.settings.bucket);
        let media_uri = self
            .stage
            .put(request.source_file(), request.file_name())
            .await
            .map_err(|err| JobError::StagingFailed(format!("{err:#}")))?;

        let handle = JobHandle::new(request.file_name(), unix_now(), media_uri);
        let spec = self.job_spec(request, &handle);
        match &spec.language {
            LanguageParams::Single { code, .. } => {
                info!("Starting job {}: single language ({code})", handle.job_name)
            }
            LanguageParams::IdentifyMultiple { options } => info!(
                "Starting job {}: multi-language ({})",
                handle.job_name,
                options.join(", ")
            ),
        }
        self.client
            .start(&spec)
            .await
            .map_err(|err| JobError::SubmissionFailed(format!("{err:#}")))?;

        let state = self.await_terminal(&handle).await?;
        match state.status {
            JobStatus::Completed => self.read_result(&state).await,
            _ => Err(JobError::TranscriptionFailed {
                reason: state.failure_reason,
            }),
        }
    }

    /// Removes the staged media file of `request`.
    #[tracing::instrument(level = "info", skip_all, fields(file = request.file_name()))]
    pub async fn release(&self, request: &TranscriptionRequest) -> Result<()> {
        self.stage.delete(request.file_name()).await
    }

    fn job_spec(&self, request: &TranscriptionRequest, handle: &JobHandle) -> JobSpec {
        let language = match request.language() {
            LanguageMode::Single(code) => LanguageParams::Single {
                code: code.clone(),
                show_speaker_labels: request.speaker_id_requested(),
                max_speaker_labels: self.settings.max_speaker_labels,
            },
            LanguageMode::MultiCandidate(options) => LanguageParams::IdentifyMultiple {
                options: options.clone(),
            },
        };
        JobSpec {
            job_name: handle.job_name.clone(),
            media_uri: handle.media_uri.clone(),
            media_format: request.media_format(&self.settings.fallback_media_format),
            language,
        }
    }

    async fn await_terminal(&self, handle: &JobHandle) -> JobResult<JobState> {
        match self.settings.max_wait {
            Some(limit) => tokio::time::timeout(limit, self.poll_until_terminal(handle))
                .await
                .map_err(|_| JobError::TimedOut {
                    job_name: handle.job_name.clone(),
                    waited: limit,
                })?,
            None => self.poll_until_terminal(handle).await,
        }
    }

    async fn poll_until_terminal(&self, handle: &JobHandle) -> JobResult<JobState> {
        loop {
            let state = self
                .client
                .status(&handle.job_name)
                .await
                .map_err(|err| JobError::StatusQueryFailed(format!("{err:#}")))?;
            if state.status.is_terminal() {
                return Ok(state);
            }
            info!(
                "Status: IN_PROGRESS... (checking again in {}s)",
                self.settings.poll_interval.as_secs()
            );
            tokio::time::sleep(self.settings.poll_interval).await;
        }
    }

    async fn read_result(&self, state: &JobState) -> JobResult<TranscriptionResult> {
        let uri = state
            .result_uri
            .as_deref()
            .ok_or_else(|| JobError::ResultUnreadable("job completed without a result location".into()))?;
        let body = self
            .client
            .fetch_result(uri)
            .await
            .map_err(|err| JobError::ResultUnreadable(format!("{err:#}")))?;
        let result: TranscriptionResult = serde_json::from_str(&body)
            .map_err(|err| JobError::ResultUnreadable(err.to_string()))?;
        debug!("Decoded result document of {:?}", result.job_name);
        Ok(result)
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}
