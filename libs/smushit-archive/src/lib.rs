//! # Smushit Archive
//!
//! Zip implementation of the `ArchiveBuilder` port. Every scratch file becomes
//! one deflate-compressed entry at the root of the archive, named after the
//! file's base name and carrying its modification time and permission bits.

mod zip_builder;

pub use zip_builder::{ArchiverConfig, ZipArchiver};
