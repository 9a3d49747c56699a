use aws_config::BehaviorVersion;
use aws_sdk_s3::{config::Region, Client};
use std::time::Duration;
use tracing::info;

/// Longest lifetime S3 accepts for a presigned URL
pub const MAX_PRESIGN_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Connection settings for the S3 backend
#[derive(Debug, Clone)]
pub struct S3Config {
    /// Bucket archives are stored in
    pub bucket: String,
    /// AWS region the bucket lives in
    pub region: String,
    /// Custom endpoint for S3-compatible backends; enables path-style addressing
    pub endpoint: Option<String>,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            bucket: "smushit".to_string(),
            region: "us-east-1".to_string(),
            endpoint: None,
        }
    }
}

/// Build an S3 client from the environment's credential chain and `config`
pub async fn build_client(config: &S3Config) -> Client {
    let shared = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.clone()))
        .load()
        .await;

    let mut builder = aws_sdk_s3::config::Builder::from(&shared);
    if let Some(endpoint) = &config.endpoint {
        // MinIO and friends only speak path-style
        builder = builder.endpoint_url(endpoint).force_path_style(true);
    }

    info!(
        region = %config.region,
        endpoint = config.endpoint.as_deref().unwrap_or("aws"),
        "Initializing S3 client"
    );

    Client::from_conf(builder.build())
}
