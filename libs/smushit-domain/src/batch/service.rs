//! Bundle service - end-to-end pipeline orchestration
//!
//! fetch (concurrent) -> join -> archive -> publish. Archiving and publishing
//! run strictly after every fetch unit has reported.

use std::path::{Path, PathBuf};
use tracing::{error, info, instrument, warn};

use super::{
    BatchCoordinator, BatchId, BatchRequest, BundleError, CallerIdentity, CoordinatorConfig,
};
use crate::archive::ArchiveSummary;
use crate::ports::{ArchiveBuilder, ObjectStore, ResourceFetcher};
use crate::storage::{PublishedLink, Publisher, PublisherConfig, StorageAddress};

/// Configuration for the bundle service
#[derive(Debug, Clone)]
pub struct BundleConfig {
    /// Directory the local archive is written to
    pub scratch_dir: PathBuf,
    /// Delete the local archive once it has been published
    pub remove_published_archive: bool,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            scratch_dir: std::env::temp_dir().join("smushit"),
            remove_published_archive: true,
        }
    }
}

/// Result of a successful bundling request
#[derive(Debug, Clone)]
pub struct BundleReceipt {
    batch_id: BatchId,
    address: StorageAddress,
    link: PublishedLink,
    downloaded: usize,
    failed: usize,
}

impl BundleReceipt {
    pub fn batch_id(&self) -> &BatchId {
        &self.batch_id
    }

    /// Where the archive was stored
    pub fn address(&self) -> &StorageAddress {
        &self.address
    }

    /// Normalized archive name, e.g. `photos.zip`
    pub fn archive_name(&self) -> &str {
        self.address.name()
    }

    pub fn link(&self) -> &PublishedLink {
        &self.link
    }

    /// Number of resources packed into the archive
    pub fn downloaded(&self) -> usize {
        self.downloaded
    }

    /// Number of resources left out because their fetch failed
    pub fn failed(&self) -> usize {
        self.failed
    }
}

/// Service that turns a batch request into a published archive
///
/// Generic over the three outbound ports; each concrete combination is
/// monomorphized, and tests plug in in-memory adapters.
pub struct BundleService<F, A, S> {
    coordinator: BatchCoordinator<F>,
    archiver: A,
    publisher: Publisher<S>,
    config: BundleConfig,
}

impl<F, A, S> BundleService<F, A, S>
where
    F: ResourceFetcher + 'static,
    A: ArchiveBuilder,
    S: ObjectStore,
{
    /// Create a new BundleService from its components
    pub fn new(
        coordinator: BatchCoordinator<F>,
        archiver: A,
        publisher: Publisher<S>,
        config: BundleConfig,
    ) -> Self {
        Self {
            coordinator,
            archiver,
            publisher,
            config,
        }
    }

    /// Create a new BundleService with default configuration everywhere
    pub fn with_adapters(fetcher: F, archiver: A, store: S) -> Self {
        Self::new(
            BatchCoordinator::new(fetcher, CoordinatorConfig::default()),
            archiver,
            Publisher::new(store, PublisherConfig::default()),
            BundleConfig::default(),
        )
    }

    /// Fetch, archive and publish one batch
    ///
    /// Only the first request-level failure is reported. Individual fetch
    /// failures are logged and counted in the receipt. Downloads land in a
    /// per-batch directory under the scratch dir, removed once the archive
    /// build is over whatever its result.
    ///
    /// # Errors
    ///
    /// - `BundleError::NoFilesDownloaded` if every fetch failed; nothing is
    ///   archived or uploaded
    /// - `BundleError::ArchiveFailure` if the archive cannot be built
    /// - `BundleError::SessionFailure` / `BundleError::PublishFailure` if the
    ///   upload or the link signing fails; the local archive is kept
    #[instrument(skip(self, request, caller), fields(batch_id = tracing::field::Empty, namespace = %caller.namespace(), urls = request.len()))]
    pub async fn bundle(
        &self,
        request: BatchRequest,
        caller: &CallerIdentity,
    ) -> Result<BundleReceipt, BundleError> {
        let batch_id = BatchId::new();
        tracing::Span::current().record("batch_id", tracing::field::display(&batch_id));

        let (desired_name, urls) = request.into_parts();
        let downloads_dir = self.config.scratch_dir.join(batch_id.to_string());
        let built = self.fetch_and_archive(&batch_id, urls, &downloads_dir).await;
        discard_downloads(&downloads_dir).await;
        let (summary, downloaded, failed) = built?;

        let link = self
            .publisher
            .publish(summary.path(), caller, &desired_name)
            .await
            .map_err(|err| {
                error!(error = %err, path = %summary.path().display(), "Failed to publish archive");
                err
            })?;

        if self.config.remove_published_archive {
            if let Err(err) = tokio::fs::remove_file(summary.path()).await {
                warn!(path = %summary.path().display(), error = %err, "Failed to remove published archive");
            }
        }

        let address = StorageAddress::derive(caller, &desired_name);
        info!(key = %address, downloaded, failed, "Batch published");

        Ok(BundleReceipt {
            batch_id,
            address,
            link,
            downloaded,
            failed,
        })
    }

    /// Fetch the batch into `downloads_dir` and pack the survivors
    async fn fetch_and_archive(
        &self,
        batch_id: &BatchId,
        urls: Vec<String>,
        downloads_dir: &Path,
    ) -> Result<(ArchiveSummary, usize, usize), BundleError> {
        let outcome = self.coordinator.run(urls, downloads_dir).await?;

        tokio::fs::create_dir_all(&self.config.scratch_dir)
            .await
            .map_err(|err| {
                BundleError::archive_failure(format!(
                    "Failed to create scratch directory '{}': {}",
                    self.config.scratch_dir.display(),
                    err
                ))
            })?;

        let archive_path = self.config.scratch_dir.join(batch_id.archive_file_name());
        let summary = self
            .archiver
            .build(&archive_path, outcome.files())
            .await
            .map_err(|err| {
                error!(error = %err, "Failed to build archive");
                BundleError::archive_failure(err.to_string())
            })?;
        info!(
            path = %summary.path().display(),
            entries = summary.entries().len(),
            size = summary.size(),
            "Archive built"
        );

        Ok((summary, outcome.succeeded(), outcome.failed()))
    }

    /// Get the service configuration
    pub fn config(&self) -> &BundleConfig {
        &self.config
    }
}

/// Remove a batch's downloaded files; they are never reused across batches
async fn discard_downloads(downloads_dir: &Path) {
    match tokio::fs::remove_dir_all(downloads_dir).await {
        Ok(()) => {}
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => {
            warn!(path = %downloads_dir.display(), error = %err, "Failed to remove downloaded files");
        }
    }
}
