use thiserror::Error;

/// Errors raised while setting up the fetcher
///
/// Per-resource failures are not errors of the fetcher itself; they travel in
/// a failed `FetchResult`.
#[derive(Error, Debug)]
pub enum FetcherError {
    /// The HTTP client could not be constructed
    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),
}
