//! # Smushit S3
//!
//! Object storage adapter backed by Amazon S3 or any S3-compatible service
//! (MinIO, Ceph). Implements the `ObjectStore` port: private uploads and
//! presigned GET links.

pub mod infrastructure;
