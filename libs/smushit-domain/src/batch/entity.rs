//! Domain entities for a bundling batch
//!
//! A batch is one caller-submitted list of resource locators plus the name the
//! caller wants for the resulting archive. Each locator produces exactly one
//! `FetchResult` once its fetch unit completes.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::batch::error::{BundleError, FetchError};
use crate::storage::address::hex_digest;

/// One caller-submitted batch of resources
///
/// # Example
///
/// ```rust
/// use smushit_domain::batch::BatchRequest;
///
/// let request = BatchRequest::new("photos", vec!["https://example.test/a.jpg".into()]).unwrap();
/// assert_eq!(request.desired_name(), "photos");
/// assert_eq!(request.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchRequest {
    /// Archive name requested by the caller, before normalization
    desired_name: String,

    /// Resource locators in caller order
    resources: Vec<String>,
}

impl BatchRequest {
    /// Create a batch request
    ///
    /// # Errors
    ///
    /// Returns `BundleError::InvalidRequest` if `resources` is empty.
    pub fn new(
        desired_name: impl Into<String>,
        resources: Vec<String>,
    ) -> Result<Self, BundleError> {
        if resources.is_empty() {
            return Err(BundleError::invalid_request("No URLs were provided"));
        }

        Ok(Self {
            desired_name: desired_name.into(),
            resources,
        })
    }

    /// Get the requested archive name
    pub fn desired_name(&self) -> &str {
        &self.desired_name
    }

    /// Get the resource locators
    pub fn resources(&self) -> &[String] {
        &self.resources
    }

    /// Number of resource locators in the batch
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Always false for a constructed request
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Split the request into its name and its locators
    pub fn into_parts(self) -> (String, Vec<String>) {
        (self.desired_name, self.resources)
    }
}

/// Opaque identity of the caller, taken from the request's API key header
///
/// The core never validates it; it only namespaces storage addresses.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CallerIdentity(String);

impl CallerIdentity {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hex digest of the identity, used as the storage namespace
    pub fn namespace(&self) -> String {
        hex_digest(&self.0)
    }
}

// The raw identity is a credential; only its digest may show up in logs.
impl fmt::Debug for CallerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CallerIdentity").field(&self.namespace()).finish()
    }
}

/// A resource that was written to the scratch directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedResource {
    local_path: PathBuf,
    size_bytes: u64,
    content_type: String,
}

impl FetchedResource {
    pub fn new(local_path: PathBuf, size_bytes: u64, content_type: impl Into<String>) -> Self {
        Self {
            local_path,
            size_bytes,
            content_type: content_type.into(),
        }
    }

    /// Final scratch path, extension included
    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    pub fn size(&self) -> u64 {
        self.size_bytes
    }

    /// MIME type sniffed from the first bytes of the body
    pub fn content_type(&self) -> &str {
        &self.content_type
    }
}

/// Result of one fetch unit
///
/// Created when the unit finishes and consumed once by the coordinator. The
/// scratch file outlives this value until the archive is built.
#[derive(Debug, Clone)]
pub struct FetchResult {
    source_url: String,
    outcome: Result<FetchedResource, FetchError>,
}

impl FetchResult {
    /// Create a successful result
    pub fn succeeded(source_url: impl Into<String>, resource: FetchedResource) -> Self {
        Self {
            source_url: source_url.into(),
            outcome: Ok(resource),
        }
    }

    /// Create a failed result
    pub fn failed(source_url: impl Into<String>, error: FetchError) -> Self {
        Self {
            source_url: source_url.into(),
            outcome: Err(error),
        }
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Scratch path of the downloaded file, if the fetch succeeded
    pub fn local_path(&self) -> Option<&Path> {
        self.outcome.as_ref().ok().map(FetchedResource::local_path)
    }

    /// Failure reason, if the fetch failed
    pub fn error(&self) -> Option<&FetchError> {
        self.outcome.as_ref().err()
    }

    /// Consume the result and return the source URL with its outcome
    pub fn into_outcome(self) -> (String, Result<FetchedResource, FetchError>) {
        (self.source_url, self.outcome)
    }
}
