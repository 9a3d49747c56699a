//! Storage domain module
//!
//! Address derivation for published archives and the service that publishes
//! them through the `ObjectStore` port.

pub mod address;
mod error;
mod publisher;

pub use address::{normalize_archive_name, StorageAddress, ARCHIVE_SUFFIX};
pub use error::StorageError;
pub use publisher::{PublishedLink, Publisher, PublisherConfig, DEFAULT_LINK_TTL};
