//! Batch domain module
//!
//! A batch request, its concurrent fetch, and the pipeline that turns the
//! fetched resources into a published archive.

mod coordinator;
mod entity;
mod error;
mod ids;
mod service;

pub use coordinator::{BatchCoordinator, BatchOutcome, CoordinatorConfig};
pub use entity::{BatchRequest, CallerIdentity, FetchResult, FetchedResource};
pub use error::{BundleError, FetchError, Result};
pub use ids::BatchId;
pub use service::{BundleConfig, BundleReceipt, BundleService};
