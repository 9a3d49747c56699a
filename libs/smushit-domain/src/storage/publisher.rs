//! Publisher - uploads a finished archive and mints its download link

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::batch::{BundleError, CallerIdentity};
use crate::content::sniff_content_type;
use crate::ports::{ObjectStore, ObjectUpload, ObjectVisibility};
use crate::storage::address::StorageAddress;

/// Validity of a download link (default: 24 hours)
pub const DEFAULT_LINK_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Configuration for the publisher
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    /// How long a minted download link stays valid
    pub link_ttl: Duration,
    /// Advisory `Expires` set on the stored object
    pub expiry_hint: Duration,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            link_ttl: DEFAULT_LINK_TTL,
            expiry_hint: DEFAULT_LINK_TTL,
        }
    }
}

/// Time-limited retrieval link for a published archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedLink {
    url: String,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl PublishedLink {
    pub fn new(url: impl Into<String>, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            url: url.into(),
            issued_at,
            expires_at,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn issued_at(&self) -> &DateTime<Utc> {
        &self.issued_at
    }

    pub fn expires_at(&self) -> &DateTime<Utc> {
        &self.expires_at
    }
}

/// Service that persists archives to the object store
///
/// Generic over any `ObjectStore`, so tests can swap the backend for an
/// in-memory one.
pub struct Publisher<S> {
    store: S,
    config: PublisherConfig,
}

impl<S> Publisher<S>
where
    S: ObjectStore,
{
    /// Create a new Publisher with the given store and configuration
    pub fn new(store: S, config: PublisherConfig) -> Self {
        Self { store, config }
    }

    /// Create a new Publisher with default configuration
    pub fn with_store(store: S) -> Self {
        Self::new(store, PublisherConfig::default())
    }

    /// Upload the archive at `local_archive_path` and return a signed link
    ///
    /// The object key is derived from `caller` and `desired_name`, so the same
    /// caller publishing under the same name overwrites its previous archive.
    ///
    /// # Errors
    ///
    /// - `BundleError::PublishFailure` if the archive cannot be read, the upload
    ///   is rejected or the link cannot be signed
    /// - `BundleError::SessionFailure` if the store cannot be reached
    #[instrument(skip(self, caller), fields(namespace = %caller.namespace(), archive = %local_archive_path.display()))]
    pub async fn publish(
        &self,
        local_archive_path: &Path,
        caller: &CallerIdentity,
        desired_name: &str,
    ) -> Result<PublishedLink, BundleError> {
        let address = StorageAddress::derive(caller, desired_name);
        let key = address.key();

        let body = tokio::fs::read(local_archive_path).await.map_err(|err| {
            BundleError::publish_failure(format!(
                "Failed to read archive '{}': {}",
                local_archive_path.display(),
                err
            ))
        })?;

        let content_type = sniff_content_type(&body).to_string();
        debug!(key = %key, size = body.len(), content_type = %content_type, "Uploading archive");

        let upload = ObjectUpload {
            key: key.clone(),
            body: Bytes::from(body),
            content_type,
            content_disposition: "attachment".to_string(),
            visibility: ObjectVisibility::Private,
            expires: offset(Utc::now(), self.config.expiry_hint)?,
        };
        self.store.put_object(upload).await?;
        info!(key = %key, "Archive uploaded");

        let issued_at = Utc::now();
        let expires_at = offset(issued_at, self.config.link_ttl)?;
        let url = self.store.presign_get(&key, self.config.link_ttl).await?;
        info!(key = %key, expires_at = %expires_at, "Download link minted");

        Ok(PublishedLink::new(url, issued_at, expires_at))
    }

    /// Get the publisher configuration
    pub fn config(&self) -> &PublisherConfig {
        &self.config
    }
}

/// `base + duration`, or an error when the result is not a representable time
fn offset(base: DateTime<Utc>, duration: Duration) -> Result<DateTime<Utc>, BundleError> {
    chrono::Duration::from_std(duration)
        .ok()
        .and_then(|delta| base.checked_add_signed(delta))
        .ok_or_else(|| {
            BundleError::internal_error(format!("Duration {:?} is out of range", duration))
        })
}
