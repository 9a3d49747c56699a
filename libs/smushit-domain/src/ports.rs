//! Ports (trait definitions) for external dependencies
//!
//! The domain defines what it needs from the network, the local filesystem and
//! the object store; adapter crates provide the implementations.
//!
//! ## Static Dispatch
//!
//! We use native Rust async traits with `impl Future` return types instead of
//! `async_trait`, so services are monomorphized over their adapters.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::archive::{ArchiveError, ArchiveSummary};
use crate::batch::FetchResult;
use crate::storage::StorageError;

/// Port for retrieving one remote resource into a scratch directory
///
/// Implementations must never fail the call itself: transport errors,
/// non-success statuses and local write failures are all reported through a
/// failed `FetchResult`.
pub trait ResourceFetcher: Send + Sync {
    /// Download `url` into `scratch_dir` and return where it landed
    ///
    /// `scratch_dir` is created if missing. The returned future is spawned on
    /// its own task, one per URL.
    fn fetch(&self, url: &str, scratch_dir: &Path) -> impl Future<Output = FetchResult> + Send;
}

/// Port for packing scratch files into a single archive
pub trait ArchiveBuilder: Send + Sync {
    /// Write `files` into a new archive at `archive_path`
    ///
    /// Entries are added in the order given, named by the files' base names.
    ///
    /// # Errors
    ///
    /// Any stat, read or write failure aborts the build. No partial archive is
    /// left behind.
    fn build(
        &self,
        archive_path: &Path,
        files: &[PathBuf],
    ) -> impl Future<Output = Result<ArchiveSummary, ArchiveError>> + Send;
}

/// Canned access policy applied to an uploaded object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectVisibility {
    Private,
}

/// Everything the object store needs to persist one object
#[derive(Debug, Clone)]
pub struct ObjectUpload {
    /// Storage key, `<namespace>/<archive name>`
    pub key: String,
    pub body: Bytes,
    pub content_type: String,
    pub content_disposition: String,
    pub visibility: ObjectVisibility,
    /// Advisory expiry; retention is enforced by the bucket's lifecycle rules
    pub expires: DateTime<Utc>,
}

/// Port for the durable object store
pub trait ObjectStore: Send + Sync {
    /// Store the object, overwriting any previous object at the same key
    ///
    /// # Errors
    ///
    /// - `StorageError::Session` if the backend cannot be reached or authenticated
    /// - `StorageError::Upload` if the backend rejects the object
    fn put_object(&self, upload: ObjectUpload) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Mint a signed GET URL for `key`, valid for `ttl`
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Signing` if the URL cannot be signed.
    fn presign_get(
        &self,
        key: &str,
        ttl: Duration,
    ) -> impl Future<Output = Result<String, StorageError>> + Send;
}
