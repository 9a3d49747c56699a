use thiserror::Error;

use crate::batch::BundleError;

/// Errors reported by an `ObjectStore` adapter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The backend could not be reached or the client could not authenticate
    #[error("Storage session error: {0}")]
    Session(String),

    /// The backend rejected the upload
    #[error("Upload failed: {0}")]
    Upload(String),

    /// The download link could not be signed
    #[error("Signing failed: {0}")]
    Signing(String),
}

impl StorageError {
    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session(msg.into())
    }

    pub fn upload(msg: impl Into<String>) -> Self {
        Self::Upload(msg.into())
    }

    pub fn signing(msg: impl Into<String>) -> Self {
        Self::Signing(msg.into())
    }
}

impl From<StorageError> for BundleError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Session(msg) => BundleError::SessionFailure(msg),
            StorageError::Upload(msg) | StorageError::Signing(msg) => {
                BundleError::PublishFailure(msg)
            }
        }
    }
}
