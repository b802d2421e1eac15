use std::time::Duration;

use thiserror::Error;

/// Terminal outcomes of a transcription job that did not produce a result.
#[derive(Error, Debug)]
pub enum JobError {
    #[error("Failed to stage media file: {0}")]
    StagingFailed(String),

    #[error("Failed to start transcription job: {0}")]
    SubmissionFailed(String),

    #[error("Failed to query job status: {0}")]
    StatusQueryFailed(String),

    #[error("Transcription failed{}", .reason.as_deref().map(|r| format!(": {r}")).unwrap_or_default())]
    TranscriptionFailed { reason: Option<String> },

    #[error("Transcript result could not be read: {0}")]
    ResultUnreadable(String),

    #[error("Job {job_name} did not finish within {}s", .waited.as_secs())]
    TimedOut { job_name: String, waited: Duration },
}

impl JobError {
    /// Process exit code reported for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            JobError::SubmissionFailed(_) => 2,
            JobError::TranscriptionFailed { .. } => 3,
            JobError::ResultUnreadable(_) => 4,
            JobError::StagingFailed(_) => 5,
            JobError::StatusQueryFailed(_) => 6,
            JobError::TimedOut { .. } => 7,
        }
    }
}

pub type JobResult<T, E = JobError> = Result<T, E>;

#[macro_export]
macro_rules! exit_err {
    ($code:expr, $fmt:expr $(, $arg:expr)*) => {
        {
            eprintln!($fmt $(, $arg)*);
            std::process::exit($code);
        }
    };
}
