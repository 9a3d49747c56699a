//! S3 Object Store Implementation
//!
//! This module implements the `ObjectStore` port on top of the AWS SDK.
//! AWS errors are classified into the domain's `StorageError` kinds: failures
//! to reach or authenticate against the service are session errors, anything
//! the service itself rejects is an upload error.

use aws_sdk_s3::{
    error::SdkError,
    presigning::PresigningConfig,
    primitives::{ByteStream, DateTime as AwsDateTime},
    types::ObjectCannedAcl,
    Client,
};
use smushit_domain::{
    ports::{ObjectStore, ObjectUpload, ObjectVisibility},
    StorageError,
};
use std::time::Duration;
use tracing::{debug, error, info, instrument};

/// S3-based implementation of the ObjectStore port
///
/// ## Configuration
///
/// The store requires:
/// - An S3 bucket name
/// - An AWS SDK S3 Client (configured with region, credentials, endpoint)
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Create a new S3 object store
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use smushit_s3::infrastructure::{build_client, S3Config, S3ObjectStore};
    ///
    /// # async fn example() {
    /// let config = S3Config::default();
    /// let client = build_client(&config).await;
    /// let store = S3ObjectStore::new(client, config.bucket);
    /// # }
    /// ```
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        let bucket = bucket.into();
        info!(bucket = %bucket, "Initializing S3ObjectStore");
        Self { client, bucket }
    }

    /// Get the bucket name
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

/// Sort an SDK failure into a session or an upload error
fn classify<E, R>(key: &str, err: SdkError<E, R>) -> StorageError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug + 'static,
{
    let detail = format!("S3 put_object failed for key '{}': {}", key, describe(&err));
    match err {
        SdkError::ConstructionFailure(_)
        | SdkError::DispatchFailure(_)
        | SdkError::TimeoutError(_) => StorageError::session(detail),
        _ => StorageError::upload(detail),
    }
}

/// Display of the innermost error; the SDK's own Display is just "service error"
fn describe(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        message = format!("{}: {}", message, inner);
        source = inner.source();
    }
    message
}

impl ObjectStore for S3ObjectStore {
    #[instrument(skip(self, upload), fields(key = %upload.key, size = upload.body.len()))]
    fn put_object(
        &self,
        upload: ObjectUpload,
    ) -> impl std::future::Future<Output = Result<(), StorageError>> + Send {
        let client = self.client.clone();
        let bucket = self.bucket.clone();

        async move {
            debug!(bucket = %bucket, content_type = %upload.content_type, "Uploading object to S3");

            let acl = match upload.visibility {
                ObjectVisibility::Private => ObjectCannedAcl::Private,
            };
            let size = upload.body.len() as i64;

            match client
                .put_object()
                .bucket(&bucket)
                .key(&upload.key)
                .body(ByteStream::from(upload.body))
                .content_length(size)
                .content_type(&upload.content_type)
                .content_disposition(&upload.content_disposition)
                .acl(acl)
                .expires(AwsDateTime::from_secs(upload.expires.timestamp()))
                .send()
                .await
            {
                Ok(_) => {
                    info!(key = %upload.key, "Successfully uploaded object to S3");
                    Ok(())
                }
                Err(err) => {
                    error!(key = %upload.key, error = ?err, "Failed to upload object to S3");
                    Err(classify(&upload.key, err))
                }
            }
        }
    }

    #[instrument(skip(self), fields(ttl_secs = ttl.as_secs()))]
    fn presign_get(
        &self,
        key: &str,
        ttl: Duration,
    ) -> impl std::future::Future<Output = Result<String, StorageError>> + Send {
        let client = self.client.clone();
        let bucket = self.bucket.clone();
        let key = key.to_string();

        async move {
            let presigning = PresigningConfig::expires_in(ttl).map_err(|err| {
                StorageError::signing(format!("Invalid link lifetime {:?}: {}", ttl, err))
            })?;

            let request = client
                .get_object()
                .bucket(&bucket)
                .key(&key)
                .presigned(presigning)
                .await
                .map_err(|err| {
                    error!(key = %key, error = ?err, "Failed to presign S3 object");
                    StorageError::signing(format!(
                        "S3 presign failed for key '{}': {}",
                        key,
                        describe(&err)
                    ))
                })?;

            debug!(key = %key, "Minted presigned GET link");
            Ok(request.uri().to_string())
        }
    }
}
