//! Integration tests for the zip archiver
//!
//! Archives are read back with `zip::ZipArchive` to check entry names,
//! compression, ordering and contents.

use smushit_archive::{ArchiverConfig, ZipArchiver};
use smushit_domain::archive::ArchiveError;
use smushit_domain::ports::ArchiveBuilder;
use std::io::Read;
use std::path::{Path, PathBuf};
use zip::{CompressionMethod, ZipArchive};

fn write_file(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn open_archive(path: &Path) -> ZipArchive<std::fs::File> {
    ZipArchive::new(std::fs::File::open(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_entries_are_flat_deflated_and_ordered() {
    let scratch = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let files = vec![
        write_file(scratch.path(), "a1.jpg", b"first file contents"),
        write_file(scratch.path(), "b2.gif", b"second file contents"),
    ];
    let archive_path = out.path().join("batch.zip");

    let summary = ZipArchiver::default()
        .build(&archive_path, &files)
        .await
        .expect("archive build");

    assert_eq!(summary.path(), archive_path);
    assert_eq!(summary.entries().len(), 2);
    assert_eq!(summary.entries()[0].name(), "a1.jpg");
    assert_eq!(summary.entries()[1].name(), "b2.gif");
    assert_eq!(summary.size(), std::fs::metadata(&archive_path).unwrap().len());

    let mut archive = open_archive(&archive_path);
    assert_eq!(archive.len(), 2);

    let mut first = archive.by_index(0).unwrap();
    assert_eq!(first.name(), "a1.jpg");
    assert_eq!(first.compression(), CompressionMethod::Deflated);
    let mut contents = Vec::new();
    first.read_to_end(&mut contents).unwrap();
    assert_eq!(contents, b"first file contents");
    drop(first);

    let second = archive.by_index(1).unwrap();
    assert_eq!(second.name(), "b2.gif");
    assert_eq!(second.size(), b"second file contents".len() as u64);
}

#[tokio::test]
async fn test_entries_carry_size_and_modification_time() {
    let scratch = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let files = vec![write_file(scratch.path(), "c3.png", &[7u8; 2048])];

    let summary = ZipArchiver::default()
        .build(&out.path().join("t.zip"), &files)
        .await
        .unwrap();

    let entry = &summary.entries()[0];
    assert_eq!(entry.size(), 2048);
    assert!(entry.modified().is_some());
    assert_eq!(entry.local_path(), files[0]);

    let mut archive = open_archive(summary.path());
    let stored = archive.by_index(0).unwrap();
    assert!(stored.last_modified().year() >= 2020);
}

#[cfg(unix)]
#[tokio::test]
async fn test_unix_permissions_are_preserved() {
    use std::os::unix::fs::PermissionsExt;

    let scratch = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let file = write_file(scratch.path(), "script", b"#!/bin/sh\n");
    std::fs::set_permissions(&file, std::fs::Permissions::from_mode(0o640)).unwrap();

    let summary = ZipArchiver::default()
        .build(&out.path().join("perm.zip"), &[file])
        .await
        .unwrap();

    let mut archive = open_archive(summary.path());
    let mode = archive.by_index(0).unwrap().unix_mode().unwrap();
    assert_eq!(mode & 0o777, 0o640);
}

#[tokio::test]
async fn test_duplicate_base_names_are_written_once() {
    let scratch = tempfile::tempdir().unwrap();
    let other = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let files = vec![
        write_file(scratch.path(), "same.gif", b"one"),
        write_file(other.path(), "same.gif", b"two"),
    ];

    let summary = ZipArchiver::default()
        .build(&out.path().join("dup.zip"), &files)
        .await
        .unwrap();

    assert_eq!(summary.entries().len(), 1);
    let mut archive = open_archive(summary.path());
    assert_eq!(archive.len(), 1);
    let mut contents = String::new();
    archive
        .by_name("same.gif")
        .unwrap()
        .read_to_string(&mut contents)
        .unwrap();
    assert_eq!(contents, "one");
}

#[tokio::test]
async fn test_missing_input_fails_and_leaves_no_archive() {
    let scratch = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let files = vec![
        write_file(scratch.path(), "ok.jpg", b"fine"),
        scratch.path().join("vanished.jpg"),
    ];
    let archive_path = out.path().join("broken.zip");

    let result = ZipArchiver::default().build(&archive_path, &files).await;

    match result {
        Err(ArchiveError::Io { path, .. }) => assert_eq!(path, files[1]),
        other => panic!("expected Io error, got {:?}", other),
    }
    assert!(!archive_path.exists());
}

#[tokio::test]
async fn test_unwritable_destination_fails() {
    let scratch = tempfile::tempdir().unwrap();
    let files = vec![write_file(scratch.path(), "x.gif", b"x")];
    let archive_path = scratch.path().join("no-such-dir").join("out.zip");

    let result = ZipArchiver::default().build(&archive_path, &files).await;

    assert!(matches!(result, Err(ArchiveError::Io { .. })));
}

#[tokio::test]
async fn test_empty_file_list_is_rejected() {
    let out = tempfile::tempdir().unwrap();
    let archive_path = out.path().join("empty.zip");

    let result = ZipArchiver::default().build(&archive_path, &[]).await;

    assert!(matches!(result, Err(ArchiveError::EmptyInput)));
    assert!(!archive_path.exists());
}

#[tokio::test]
async fn test_compression_level_is_configurable() {
    let scratch = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let body = "smush ".repeat(4096);
    let files = vec![write_file(scratch.path(), "text.txt", body.as_bytes())];

    let archiver = ZipArchiver::new(ArchiverConfig {
        compression_level: Some(9),
    });
    let summary = archiver
        .build(&out.path().join("level.zip"), &files)
        .await
        .unwrap();

    assert!(summary.size() < body.len() as u64);
    let mut archive = open_archive(summary.path());
    let mut contents = String::new();
    archive
        .by_index(0)
        .unwrap()
        .read_to_string(&mut contents)
        .unwrap();
    assert_eq!(contents, body);
}
