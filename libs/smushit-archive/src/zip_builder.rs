//! Zip archive builder
//!
//! The zip writer is synchronous, so builds run on tokio's blocking pool.

use chrono::{DateTime, Datelike, Timelike, Utc};
use smushit_domain::{
    archive::{ArchiveEntry, ArchiveError, ArchiveSummary},
    ports::ArchiveBuilder,
};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};
use zip::{write::FileOptions, CompressionMethod, ZipWriter};

/// Configuration for the zip archiver
#[derive(Debug, Clone, Default)]
pub struct ArchiverConfig {
    /// Deflate level (0-9); `None` uses the library default
    pub compression_level: Option<i32>,
}

/// zip-based implementation of the ArchiveBuilder port
#[derive(Debug, Clone, Default)]
pub struct ZipArchiver {
    config: ArchiverConfig,
}

impl ZipArchiver {
    /// Create a new archiver with the given configuration
    pub fn new(config: ArchiverConfig) -> Self {
        Self { config }
    }

    /// Build the archive on the current thread
    ///
    /// On failure the partially written archive is removed.
    #[instrument(skip(self, files), fields(archive = %archive_path.display(), files = files.len()))]
    pub fn build_blocking(
        &self,
        archive_path: &Path,
        files: &[PathBuf],
    ) -> Result<ArchiveSummary, ArchiveError> {
        if files.is_empty() {
            return Err(ArchiveError::EmptyInput);
        }

        let result = self.write_archive(archive_path, files);
        if result.is_err() {
            if let Err(err) = std::fs::remove_file(archive_path) {
                debug!(error = %err, "No partial archive to remove");
            }
        }
        result
    }

    fn write_archive(
        &self,
        archive_path: &Path,
        files: &[PathBuf],
    ) -> Result<ArchiveSummary, ArchiveError> {
        let output = File::create(archive_path).map_err(|err| ArchiveError::io(archive_path, err))?;
        let mut writer = ZipWriter::new(BufWriter::new(output));
        let mut entries = Vec::with_capacity(files.len());
        let mut names = HashSet::new();

        for path in files {
            let name = entry_name(path)?;
            if !names.insert(name.clone()) {
                warn!(path = %path.display(), name = %name, "Skipping duplicate archive entry");
                continue;
            }

            let mut source = File::open(path).map_err(|err| ArchiveError::io(path, err))?;
            let metadata = source.metadata().map_err(|err| ArchiveError::io(path, err))?;
            let modified = metadata.modified().ok().map(DateTime::<Utc>::from);

            let mut options = FileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .compression_level(self.config.compression_level)
                .large_file(metadata.len() >= u64::from(u32::MAX));
            if let Some(modified) = modified {
                options = options.last_modified_time(to_zip_datetime(&modified));
            }
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                options = options.unix_permissions(metadata.permissions().mode());
            }

            writer
                .start_file(name.as_str(), options)
                .map_err(|err| ArchiveError::format(err.to_string()))?;
            let copied = std::io::copy(&mut source, &mut writer)
                .map_err(|err| ArchiveError::io(path, err))?;
            debug!(name = %name, size = copied, "Added archive entry");

            entries.push(ArchiveEntry::new(path.clone(), name, metadata.len(), modified));
        }

        let mut output = writer
            .finish()
            .map_err(|err| ArchiveError::format(err.to_string()))?;
        output
            .flush()
            .map_err(|err| ArchiveError::io(archive_path, err))?;

        let size = std::fs::metadata(archive_path)
            .map_err(|err| ArchiveError::io(archive_path, err))?
            .len();

        info!(entries = entries.len(), size, "Archive written");

        Ok(ArchiveSummary::new(archive_path.to_path_buf(), entries, size))
    }
}

impl ArchiveBuilder for ZipArchiver {
    fn build(
        &self,
        archive_path: &Path,
        files: &[PathBuf],
    ) -> impl std::future::Future<Output = Result<ArchiveSummary, ArchiveError>> + Send {
        let archiver = self.clone();
        let archive_path = archive_path.to_path_buf();
        let files = files.to_vec();

        async move {
            let task_path = archive_path.clone();
            tokio::task::spawn_blocking(move || archiver.build_blocking(&task_path, &files))
                .await
                .map_err(|err| ArchiveError::io(&archive_path, format!("archive task failed: {}", err)))?
        }
    }
}

/// Flat entry name: the file's base name, no directories
fn entry_name(path: &Path) -> Result<String, ArchiveError> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| ArchiveError::io(path, "path has no file name"))
}

/// Zip timestamps have two-second resolution and cover 1980..=2107
fn to_zip_datetime(timestamp: &DateTime<Utc>) -> zip::DateTime {
    // DOS timestamps cover 1980-01-01 through 2107-12-31 at two-second resolution
    let year = timestamp.year();
    if year < 1980 {
        return zip::DateTime::default();
    }
    if year > 2107 {
        return zip::DateTime::from_date_and_time(2107, 12, 31, 23, 59, 58).unwrap_or_default();
    }
    zip::DateTime::from_date_and_time(
        year as u16,
        timestamp.month() as u8,
        timestamp.day() as u8,
        timestamp.hour() as u8,
        timestamp.minute() as u8,
        timestamp.second() as u8,
    )
    .unwrap_or_default()
}
