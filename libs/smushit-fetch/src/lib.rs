//! # Smushit Fetch
//!
//! HTTP implementation of the `ResourceFetcher` port. Each resource is streamed
//! into the scratch directory under a name derived from its URL, and given an
//! extension from the URL path or, failing that, from its sniffed content type.

mod error;
mod fetcher;

pub use error::FetcherError;
pub use fetcher::{FetcherConfig, HttpFetcher, DEFAULT_USER_AGENT};
