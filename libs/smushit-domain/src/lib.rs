//! # Smushit Domain Layer
//!
//! This crate contains the business logic of the Smushit bundling pipeline:
//! a batch of remote resources is fetched concurrently, the survivors are
//! packed into a single archive, and the archive is published to object
//! storage behind a time-limited download link.
//!
//! - **Entities**: batch requests, caller identities, fetch results, archive
//!   entries, storage addresses and published links
//! - **Ports**: traits for the outbound adapters (`ResourceFetcher`,
//!   `ArchiveBuilder`, `ObjectStore`)
//! - **Services**: `BatchCoordinator`, `Publisher` and the end-to-end
//!   `BundleService`
//!
//! ## Architecture
//!
//! The domain has NO dependency on HTTP clients, archive formats or AWS.
//! Adapter crates implement the ports and the application wires them together.
//!
//! ## Example
//!
//! ```rust
//! use smushit_domain::batch::{BatchRequest, BundleService, CallerIdentity};
//! use smushit_domain::ports::{ArchiveBuilder, ObjectStore, ResourceFetcher};
//!
//! async fn example<F, A, S>(service: BundleService<F, A, S>)
//! where
//!     F: ResourceFetcher + 'static,
//!     A: ArchiveBuilder,
//!     S: ObjectStore,
//! {
//!     let request = BatchRequest::new("photos", vec!["https://example.test/a.jpg".into()]).unwrap();
//!     let caller = CallerIdentity::new("api-key");
//!     let receipt = service.bundle(request, &caller).await.unwrap();
//!     println!("Download from {}", receipt.link().url());
//! }
//! ```

pub mod archive;
pub mod batch;
pub mod content;
pub mod ports;
pub mod storage;

// Re-export commonly used types
pub use archive::{ArchiveEntry, ArchiveError, ArchiveSummary};
pub use batch::{
    BatchCoordinator, BatchId, BatchOutcome, BatchRequest, BundleConfig, BundleError,
    BundleReceipt, BundleService, CallerIdentity, CoordinatorConfig, FetchError, FetchResult,
    FetchedResource,
};
pub use ports::{ArchiveBuilder, ObjectStore, ObjectUpload, ResourceFetcher};
pub use storage::{PublishedLink, Publisher, PublisherConfig, StorageAddress, StorageError};
