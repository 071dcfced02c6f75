//! How remote failures surface from resolution

use super::test_utils::{open_faulty_master, Fault, Operation};
use githubfs::remote::memory::RemoteCall;
use githubfs::{FsError, NodeKind, RemoteError};

fn listed(calls: &[RemoteCall]) -> bool {
    calls
        .iter()
        .any(|c| matches!(c, RemoteCall::FetchDirectory(_)))
}

#[test]
fn test_listing_mismatch_after_file_mismatch_is_not_found() {
    let (inner, faulty, fs) = open_faulty_master();
    faulty.fail(Operation::FetchFile, "pom.xml", Fault::Mismatch(NodeKind::Directory));

    let err = fs.resolve(&fs.path("pom.xml", &[]).unwrap()).unwrap_err();
    match err {
        FsError::NotFound(path) => assert_eq!(path, "pom.xml"),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(inner.calls(), vec![RemoteCall::FetchDirectory("pom.xml".into())]);
}

#[test]
fn test_directory_that_lists_as_file_is_not_found() {
    let (_inner, faulty, fs) = open_faulty_master();
    faulty.fail(Operation::FetchDirectory, "docs", Fault::Mismatch(NodeKind::File));

    let err = fs.resolve(&fs.path("/docs", &[]).unwrap()).unwrap_err();
    assert!(matches!(err, FsError::NotFound(ref path) if path == "docs"));
}

#[test]
fn test_unauthorized_fetch_is_not_retried_as_listing() {
    let (inner, faulty, fs) = open_faulty_master();
    faulty.fail(Operation::FetchFile, "src", Fault::Unauthorized);

    let err = fs.resolve(&fs.path("src", &[]).unwrap()).unwrap_err();
    assert!(matches!(err, FsError::Remote(RemoteError::Unauthorized(_))));
    assert!(!listed(&inner.calls()));
}

#[test]
fn test_rate_limited_fetch_is_not_retried_as_listing() {
    let (inner, faulty, fs) = open_faulty_master();
    faulty.fail(Operation::FetchFile, "README.md", Fault::RateLimited);

    let err = fs.resolve(&fs.path("README.md", &[]).unwrap()).unwrap_err();
    assert!(matches!(err, FsError::Remote(RemoteError::RateLimited(_))));
    assert!(err.to_string().contains("Rate limit"));
    assert!(!listed(&inner.calls()));
}

#[test]
fn test_nested_listing_failure_fails_whole_directory() {
    let (inner, faulty, fs) = open_faulty_master();
    faulty.fail(Operation::FetchDirectory, "src/main/java", Fault::RateLimited);

    let err = fs.resolve(&fs.path("src", &[]).unwrap()).unwrap_err();
    assert!(matches!(err, FsError::Remote(RemoteError::RateLimited(_))));
    assert!(listed(&inner.calls()));

    let err = fs.directory(&fs.path("/", &[]).unwrap()).unwrap_err();
    assert!(matches!(err, FsError::Remote(RemoteError::RateLimited(_))));
}

#[test]
fn test_nested_listing_mismatch_names_the_child() {
    let (_inner, faulty, fs) = open_faulty_master();
    faulty.fail(
        Operation::FetchDirectory,
        "src/main/java/fr",
        Fault::Mismatch(NodeKind::File),
    );

    let err = fs.resolve(&fs.path("src", &[]).unwrap()).unwrap_err();
    match &err {
        FsError::NotFound(path) => assert_eq!(path, "src/main/java/fr"),
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(err.to_string().contains("src/main/java/fr"));

    // The explicit directory call names the same child.
    let err = fs.directory(&fs.path("src/main", &[]).unwrap()).unwrap_err();
    assert!(matches!(err, FsError::NotFound(ref path) if path == "src/main/java/fr"));
}
