use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    InProgress,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, JobStatus::InProgress)
    }
}

/// Snapshot returned by a status query.
#[derive(Debug, Clone)]
pub struct JobState {
    pub status: JobStatus,
    /// Location of the result document, set once the job completed.
    pub result_uri: Option<String>,
    pub failure_reason: Option<String>,
}

/// Language parameters of a job submission.
#[derive(Debug, Clone, PartialEq)]
pub enum LanguageParams {
    Single {
        code: String,
        show_speaker_labels: bool,
        max_speaker_labels: u32,
    },
    IdentifyMultiple {
        options: Vec<String>,
    },
}

/// Everything the service needs to start a job.
#[derive(Debug, Clone)]
pub struct JobSpec {
    pub job_name: String,
    pub media_uri: String,
    pub media_format: String,
    pub language: LanguageParams,
}

/// Remote transcription service.
#[async_trait]
pub trait JobClient: Send + Sync {
    async fn start(&self, spec: &JobSpec) -> Result<()>;

    async fn status(&self, job_name: &str) -> Result<JobState>;

    /// Downloads the raw result document.
    async fn fetch_result(&self, result_uri: &str) -> Result<String>;
}

/// Remote object storage the media file is staged in.
#[async_trait]
pub trait ObjectStage: Send + Sync {
    /// Uploads `local_path` under `remote_key` and returns the media URI the
    /// transcription service reads it from.
    async fn put(&self, local_path: &Path, remote_key: &str) -> Result<String>;

    async fn delete(&self, remote_key: &str) -> Result<()>;
}
