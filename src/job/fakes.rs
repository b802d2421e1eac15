//! In-memory job service and object stage with scripted responses.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::config::JobSettings;
use crate::job::client::{JobClient, JobSpec, JobState, JobStatus, ObjectStage};

pub(crate) const RESULT_URI: &str = "https://results.example/job.json";

#[derive(Default)]
pub(crate) struct Recorded {
    pub(crate) started: Vec<JobSpec>,
    pub(crate) status_calls: usize,
    pub(crate) put: Vec<String>,
    pub(crate) deleted: Vec<String>,
}

pub(crate) struct FakeClient {
    pub(crate) statuses: Mutex<VecDeque<JobState>>,
    pub(crate) reject_start: bool,
    pub(crate) body: String,
    pub(crate) recorded: Arc<Mutex<Recorded>>,
}

impl FakeClient {
    pub(crate) fn new(statuses: &[JobStatus], body: &str, recorded: Arc<Mutex<Recorded>>) -> Self {
        let statuses = statuses
            .iter()
            .map(|&status| JobState {
                status,
                result_uri: (status == JobStatus::Completed).then(|| RESULT_URI.to_string()),
                failure_reason: None,
            })
            .collect();
        Self {
            statuses: Mutex::new(statuses),
            reject_start: false,
            body: body.to_string(),
            recorded,
        }
    }
}

#[async_trait]
impl JobClient for FakeClient {
    async fn start(&self, spec: &JobSpec) -> Result<()> {
        if self.reject_start {
            bail!("BadRequestException: invalid language code");
        }
        self.recorded.lock().unwrap().started.push(spec.clone());
        Ok(())
    }

    async fn status(&self, _job_name: &str) -> Result<JobState> {
        self.recorded.lock().unwrap().status_calls += 1;
        let mut statuses = self.statuses.lock().unwrap();
        match statuses.len() {
            0 => bail!("no scripted status left"),
            // The last scripted status repeats forever
            1 => Ok(statuses[0].clone()),
            _ => Ok(statuses.pop_front().unwrap()),
        }
    }

    async fn fetch_result(&self, result_uri: &str) -> Result<String> {
        assert_eq!(result_uri, RESULT_URI);
        Ok(self.body.clone())
    }
}

pub(crate) struct FakeStage {
    pub(crate) recorded: Arc<Mutex<Recorded>>,
}

#[async_trait]
impl ObjectStage for FakeStage {
    async fn put(&self, _local_path: &Path, remote_key: &str) -> Result<String> {
        self.recorded.lock().unwrap().put.push(remote_key.to_string());
        Ok(format!("s3://test-bucket/{remote_key}"))
    }

    async fn delete(&self, remote_key: &str) -> Result<()> {
        self.recorded.lock().unwrap().deleted.push(remote_key.to_string());
        Ok(())
    }
}

pub(crate) fn settings(max_wait: Option<Duration>) -> JobSettings {
    JobSettings {
        bucket: "test-bucket".into(),
        max_speaker_labels: 10,
        poll_interval: Duration::from_secs(5),
        max_wait,
        fallback_media_format: "mp4".into(),
    }
}

pub(crate) const PLAIN_BODY: &str = r#"{"results":{"transcripts":[{"transcript":"Hello world"}]}}"#;
