//! Every mutation is refused

use super::test_utils::open_master;
use githubfs::FsError;
use std::io::{ErrorKind, Write};

#[test]
fn test_filesystem_mutators() {
    let (api, fs) = open_master();
    assert!(fs.is_read_only());
    assert!(fs.is_open());

    let pom = fs.path("pom.xml", &[]).unwrap();
    let target = fs.path("copy.xml", &[]).unwrap();
    assert!(matches!(fs.write(&pom, b"<x/>"), Err(FsError::ReadOnly)));
    assert!(matches!(fs.create_directory(&target), Err(FsError::ReadOnly)));
    assert!(matches!(fs.delete(&pom), Err(FsError::ReadOnly)));
    assert!(matches!(fs.copy(&pom, &target), Err(FsError::ReadOnly)));
    assert!(matches!(fs.move_path(&pom, &target), Err(FsError::ReadOnly)));

    // Refused before any remote traffic.
    assert!(api.calls().is_empty());
    assert_eq!(fs.read_all(&pom).unwrap(), b"<project/>");
}

#[test]
fn test_file_content_mutators() {
    let (_api, fs) = open_master();
    let file = fs.file(&fs.path("README.md", &[]).unwrap()).unwrap();
    assert!(matches!(file.write(b"x"), Err(FsError::ReadOnly)));
    assert!(matches!(file.append(b"x"), Err(FsError::ReadOnly)));
    assert!(matches!(file.truncate(0), Err(FsError::ReadOnly)));
}

#[test]
fn test_byte_channel_refuses_writes() {
    let (_api, fs) = open_master();
    let mut channel = fs
        .new_byte_channel(&fs.path("README.md", &[]).unwrap())
        .unwrap();
    let err = channel.write(b"x").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    assert!(matches!(channel.truncate(0), Err(FsError::ReadOnly)));
    assert_eq!(channel.size(), 11);
}
