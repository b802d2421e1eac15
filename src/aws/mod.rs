use aws_config::{BehaviorVersion, Region, SdkConfig};

pub mod s3;
pub mod transcribe;

pub use s3::S3Stage;
pub use transcribe::TranscribeClient;

/// Loads credentials from the default provider chain for `region`.
pub async fn load_sdk_config(region: &str) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .load()
        .await
}
