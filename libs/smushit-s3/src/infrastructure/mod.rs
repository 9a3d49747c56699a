//! S3 infrastructure

mod config;
mod s3_object_store;

pub use config::{build_client, S3Config, MAX_PRESIGN_TTL};
pub use s3_object_store::S3ObjectStore;
