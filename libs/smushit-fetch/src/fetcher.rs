//! HTTP fetcher implementation
//!
//! Downloads one resource per call. The body is streamed to disk while its
//! first bytes are kept aside for content sniffing.

use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use smushit_domain::{
    batch::{FetchError, FetchResult, FetchedResource},
    content::{
        extension_from_url_path, resolve_extension, scratch_file_name, sniff_content_type,
        SNIFF_LEN,
    },
    ports::ResourceFetcher,
};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};
use url::Url;

use crate::error::FetcherError;

/// Browser-like user agent; some origins refuse obvious bots
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Configuration for the HTTP fetcher
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Whole-request timeout; the only thing that ends a hanging fetch
    pub timeout: Duration,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// reqwest-based implementation of the ResourceFetcher port
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    config: FetcherConfig,
}

impl HttpFetcher {
    /// Create a new fetcher
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use smushit_fetch::{FetcherConfig, HttpFetcher};
    ///
    /// let fetcher = HttpFetcher::new(FetcherConfig::default()).unwrap();
    /// ```
    pub fn new(config: FetcherConfig) -> Result<Self, FetcherError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;

        info!(
            timeout_secs = config.timeout.as_secs(),
            "Initializing HttpFetcher"
        );

        Ok(Self { client, config })
    }

    /// Get the fetcher configuration
    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    #[instrument(skip(self))]
    async fn download(&self, url: &str, scratch_dir: &Path) -> Result<FetchedResource, FetchError> {
        let parsed = Url::parse(url).map_err(|err| FetchError::invalid_url(url, err.to_string()))?;
        let url_path = parsed.path().to_string();
        let url_extension = extension_from_url_path(&url_path);

        tokio::fs::create_dir_all(scratch_dir).await.map_err(|err| {
            FetchError::io(format!(
                "Failed to create scratch directory '{}': {}",
                scratch_dir.display(),
                err
            ))
        })?;

        let response = self.client.get(parsed).send().await.map_err(|err| {
            if err.is_timeout() {
                FetchError::transport(format!("Timeout fetching '{}': {}", url, err))
            } else if err.is_connect() {
                FetchError::transport(format!("Connection failed for '{}': {}", url, err))
            } else {
                FetchError::transport(format!("Failed to fetch '{}': {}", url, err))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::status(status.as_u16()));
        }

        let staging = scratch_dir.join(scratch_file_name(url, url_extension));

        let (size, head) = match stream_to_file(response, &staging).await {
            Ok(written) => written,
            Err(err) => {
                if let Err(cleanup) = tokio::fs::remove_file(&staging).await {
                    debug!(path = %staging.display(), error = %cleanup, "No partial file to remove");
                }
                return Err(err);
            }
        };

        let content_type = sniff_content_type(&head);

        // The staging name already carries any extension from the URL
        let local_path = match resolve_extension(&url_path, content_type) {
            Some(ext) if url_extension.is_none() => {
                let target = scratch_dir.join(scratch_file_name(url, Some(ext)));
                tokio::fs::rename(&staging, &target).await.map_err(|err| {
                    FetchError::io(format!(
                        "Failed to rename '{}' to '{}': {}",
                        staging.display(),
                        target.display(),
                        err
                    ))
                })?;
                target
            }
            _ => staging,
        };

        info!(
            path = %local_path.display(),
            size,
            content_type,
            "Resource downloaded"
        );

        Ok(FetchedResource::new(local_path, size, content_type))
    }
}

/// Write the response body to `path`, returning its size and leading bytes
async fn stream_to_file(
    mut response: reqwest::Response,
    path: &Path,
) -> Result<(u64, Vec<u8>), FetchError> {
    let write_err = |err: std::io::Error| {
        FetchError::io(format!("Failed to write '{}': {}", path.display(), err))
    };

    let mut file = tokio::fs::File::create(path).await.map_err(write_err)?;
    let mut head = Vec::with_capacity(SNIFF_LEN);
    let mut size = 0u64;

    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|err| FetchError::transport(format!("Failed to read response body: {}", err)))?
    {
        if head.len() < SNIFF_LEN {
            let take = (SNIFF_LEN - head.len()).min(chunk.len());
            head.extend_from_slice(&chunk[..take]);
        }
        file.write_all(&chunk).await.map_err(write_err)?;
        size += chunk.len() as u64;
    }

    file.flush().await.map_err(write_err)?;

    Ok((size, head))
}

impl ResourceFetcher for HttpFetcher {
    fn fetch(
        &self,
        url: &str,
        scratch_dir: &Path,
    ) -> impl std::future::Future<Output = FetchResult> + Send {
        let url = url.to_string();
        let scratch_dir = scratch_dir.to_path_buf();

        async move {
            match self.download(&url, &scratch_dir).await {
                Ok(resource) => FetchResult::succeeded(url, resource),
                Err(err) => {
                    debug!(url = %url, error = %err, "Download failed");
                    FetchResult::failed(url, err)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_uses_browser_user_agent() {
        let config = FetcherConfig::default();

        assert!(config.user_agent.starts_with("Mozilla/5.0"));
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_invalid_url_is_reported_without_network() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = HttpFetcher::new(FetcherConfig::default()).unwrap();

        let result = fetcher.fetch("not a url", dir.path()).await;

        assert!(!result.is_success());
        assert!(matches!(result.error(), Some(FetchError::InvalidUrl { .. })));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
