//! Batch coordinator - concurrent fan-out of fetch units
//!
//! Every URL gets its own task. Each task sends exactly one `FetchResult` on a
//! channel sized to the batch, and the coordinator drains exactly that many
//! messages before returning. Nothing else is shared between tasks.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, error, info, warn};

use super::{BundleError, FetchError, FetchResult};
use crate::ports::ResourceFetcher;

/// Configuration for the batch coordinator
#[derive(Debug, Clone, Default)]
pub struct CoordinatorConfig {
    /// Cap on simultaneous fetches; `None` fans out to the whole batch
    pub max_concurrent_fetches: Option<usize>,
}

/// What survived a batch
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    files: Vec<PathBuf>,
    failures: Vec<(String, FetchError)>,
}

impl BatchOutcome {
    /// Scratch paths of successful fetches, in completion order
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// URLs that could not be fetched, with the reason
    pub fn failures(&self) -> &[(String, FetchError)] {
        &self.failures
    }

    pub fn succeeded(&self) -> usize {
        self.files.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn into_files(self) -> Vec<PathBuf> {
        self.files
    }
}

/// Fans a batch out to the fetcher and joins the results
pub struct BatchCoordinator<F> {
    fetcher: Arc<F>,
    config: CoordinatorConfig,
}

impl<F> BatchCoordinator<F>
where
    F: ResourceFetcher + 'static,
{
    /// Create a new coordinator with the given fetcher and configuration
    pub fn new(fetcher: F, config: CoordinatorConfig) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            config,
        }
    }

    /// Create a new coordinator with unbounded fan-out
    pub fn with_fetcher(fetcher: F) -> Self {
        Self::new(fetcher, CoordinatorConfig::default())
    }

    /// Fetch every URL concurrently into `scratch_dir` and collect the successes
    ///
    /// Duplicate URLs are fetched once. A failed fetch never cancels its
    /// siblings; it is logged and left out of the outcome's files. The call
    /// returns only after every fetch unit has reported.
    ///
    /// # Errors
    ///
    /// Returns `BundleError::NoFilesDownloaded` if no fetch succeeded.
    pub async fn run(
        &self,
        urls: Vec<String>,
        scratch_dir: &Path,
    ) -> Result<BatchOutcome, BundleError> {
        let urls = dedup_preserving_order(urls);
        let attempted = urls.len();
        if attempted == 0 {
            return Err(BundleError::NoFilesDownloaded { attempted });
        }

        let limiter = self
            .config
            .max_concurrent_fetches
            .map(|limit| Arc::new(Semaphore::new(limit.max(1))));

        info!(
            urls = attempted,
            max_concurrent = ?self.config.max_concurrent_fetches,
            "Starting batch fetch"
        );

        let (tx, mut rx) = mpsc::channel::<FetchResult>(attempted);
        for url in urls {
            let tx = tx.clone();
            let fetcher = Arc::clone(&self.fetcher);
            let limiter = limiter.clone();
            let scratch_dir = scratch_dir.to_path_buf();

            tokio::spawn(async move {
                let _permit = match limiter {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };

                let task_url = url.clone();
                let unit =
                    tokio::spawn(async move { fetcher.fetch(&task_url, &scratch_dir).await });
                let result = match unit.await {
                    Ok(result) => result,
                    Err(join_err) => {
                        FetchResult::failed(url, FetchError::Aborted(join_err.to_string()))
                    }
                };

                // The receiver only goes away if the coordinator itself was dropped.
                let _ = tx.send(result).await;
            });
        }
        drop(tx);

        let mut outcome = BatchOutcome::default();
        let mut seen = HashSet::new();
        for _ in 0..attempted {
            let Some(result) = rx.recv().await else {
                error!("Result channel closed before every fetch unit reported");
                break;
            };

            match result.into_outcome() {
                (url, Ok(resource)) => {
                    debug!(url = %url, path = %resource.local_path().display(), "Fetch succeeded");
                    let path = resource.local_path().to_path_buf();
                    if seen.insert(path.clone()) {
                        outcome.files.push(path);
                    }
                }
                (url, Err(err)) => {
                    warn!(url = %url, error = %err, "Fetch failed, excluding from archive");
                    outcome.failures.push((url, err));
                }
            }
        }

        info!(
            succeeded = outcome.succeeded(),
            failed = outcome.failed(),
            "Batch fetch joined"
        );

        if outcome.files.is_empty() {
            error!(attempted, "No files were successfully downloaded");
            return Err(BundleError::NoFilesDownloaded { attempted });
        }

        Ok(outcome)
    }

    /// Get the coordinator configuration
    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }
}

fn dedup_preserving_order(urls: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.into_iter()
        .filter(|url| seen.insert(url.clone()))
        .collect()
}
