use std::path::Path;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use crate::job::client::ObjectStage;

/// Stages media files in a single S3 bucket.
pub struct S3Stage {
    client: Client,
    bucket: String,
}

impl S3Stage {
    pub fn new(sdk_config: &SdkConfig, bucket: &str) -> Self {
        Self {
            client: Client::new(sdk_config),
            bucket: bucket.to_string(),
        }
    }
}

#[async_trait]
impl ObjectStage for S3Stage {
    #[tracing::instrument(level = "info", skip(self))]
    async fn put(&self, local_path: &Path, remote_key: &str) -> Result<String> {
        let body = ByteStream::from_path(local_path)
            .await
            .with_context(|| format!("Failed to read {}", local_path.display()))?;
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(remote_key)
            .body(body)
            .send()
            .await
            .map_err(|err| anyhow!("{}", DisplayErrorContext(&err)))
            .with_context(|| format!("Failed to upload to s3://{}/{remote_key}", self.bucket))?;
        Ok(format!("s3://{}/{remote_key}", self.bucket))
    }

    #[tracing::instrument(level = "info", skip(self))]
    async fn delete(&self, remote_key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(remote_key)
            .send()
            .await
            .map_err(|err| anyhow!("{}", DisplayErrorContext(&err)))
            .with_context(|| format!("Failed to delete s3://{}/{remote_key}", self.bucket))?;
        Ok(())
    }
}
