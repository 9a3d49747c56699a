//! Domain errors for batch bundling
//!
//! `FetchError` describes why a single resource could not be retrieved and is
//! recovered locally by the coordinator. `BundleError` is the request-level
//! taxonomy: the first of these encountered ends the pipeline.

use thiserror::Error;

/// Errors that can occur while fetching a single resource
///
/// None of these are fatal to a batch; the resource is simply left out of the
/// archive.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The locator is not a valid absolute URL
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The request could not be sent or the response could not be read
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The origin answered with a status outside the 2xx range
    #[error("non-2xx status: {status}")]
    Status { status: u16 },

    /// The scratch file could not be written
    #[error("Local I/O failure: {0}")]
    Io(String),

    /// The fetch unit ended without producing a result
    #[error("Fetch aborted: {0}")]
    Aborted(String),
}

impl FetchError {
    /// Create an invalid URL error
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a transport error with a message
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a non-success status error
    pub fn status(status: u16) -> Self {
        Self::Status { status }
    }

    /// Create a local I/O error with a message
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }
}

/// Errors that end a bundling request
///
/// Internally each failure category keeps its own variant; the HTTP boundary
/// flattens them all into a single error shape.
#[derive(Error, Debug)]
pub enum BundleError {
    /// The batch request is empty or malformed
    #[error("{0}")]
    InvalidRequest(String),

    /// Every fetch in the batch failed
    #[error("No files were successfully downloaded")]
    NoFilesDownloaded { attempted: usize },

    /// The archive could not be built
    #[error("Archive build failed: {0}")]
    ArchiveFailure(String),

    /// No session with the storage backend could be established
    #[error("Storage session failed: {0}")]
    SessionFailure(String),

    /// The upload or the link signing failed
    #[error("Publish failed: {0}")]
    PublishFailure(String),

    /// An unexpected internal error occurred
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl BundleError {
    /// Create an invalid request error with a message
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create an archive failure error with a message
    pub fn archive_failure(msg: impl Into<String>) -> Self {
        Self::ArchiveFailure(msg.into())
    }

    /// Create a publish failure error with a message
    pub fn publish_failure(msg: impl Into<String>) -> Self {
        Self::PublishFailure(msg.into())
    }

    /// Create an internal error with a message
    pub fn internal_error(msg: impl Into<String>) -> Self {
        Self::InternalError(msg.into())
    }
}

/// Result type alias for bundling operations
pub type Result<T> = std::result::Result<T, BundleError>;
