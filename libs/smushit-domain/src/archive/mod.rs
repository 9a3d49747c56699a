//! Archive domain types
//!
//! The archive itself is produced by an `ArchiveBuilder` adapter; the domain
//! only describes what went into it.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// One file packed into the archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Scratch file the entry was read from
    local_path: PathBuf,
    /// Flat entry name inside the archive (base name of `local_path`)
    name: String,
    size_bytes: u64,
    modified: Option<DateTime<Utc>>,
}

impl ArchiveEntry {
    pub fn new(
        local_path: PathBuf,
        name: impl Into<String>,
        size_bytes: u64,
        modified: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            local_path,
            name: name.into(),
            size_bytes,
            modified,
        }
    }

    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Uncompressed size recorded at stat time
    pub fn size(&self) -> u64 {
        self.size_bytes
    }

    pub fn modified(&self) -> Option<&DateTime<Utc>> {
        self.modified.as_ref()
    }
}

/// Description of a finished archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    path: PathBuf,
    entries: Vec<ArchiveEntry>,
    size_bytes: u64,
}

impl ArchiveSummary {
    pub fn new(path: PathBuf, entries: Vec<ArchiveEntry>, size_bytes: u64) -> Self {
        Self {
            path,
            entries,
            size_bytes,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entries in the order they were written
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Size of the archive file on disk
    pub fn size(&self) -> u64 {
        self.size_bytes
    }
}

/// Errors that can occur while building an archive
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// There is nothing to archive
    #[error("No files to archive")]
    EmptyInput,

    /// A file could not be stat'ed, read or written
    #[error("I/O error on '{path}': {reason}")]
    Io { path: PathBuf, reason: String },

    /// The archive writer rejected an entry
    #[error("Archive format error: {0}")]
    Format(String),
}

impl ArchiveError {
    /// Create an I/O error for `path`
    pub fn io(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Io {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a format error with a message
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }
}
