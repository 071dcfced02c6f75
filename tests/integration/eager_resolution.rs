//! Remote call patterns of file/directory disambiguation

use super::test_utils::{open_master, populated_api, repository, MASTER};
use githubfs::remote::memory::RemoteCall;
use githubfs::{ContentResolver, FileSystemId, RepoPath};

fn listings(calls: &[RemoteCall]) -> usize {
    calls
        .iter()
        .filter(|c| matches!(c, RemoteCall::FetchDirectory(_)))
        .count()
}

#[test]
fn test_file_needs_one_fetch() {
    let (api, fs) = open_master();
    let entry = fs.resolve(&fs.path("pom.xml", &[]).unwrap()).unwrap();
    assert!(entry.is_file());
    assert_eq!(api.calls(), vec![RemoteCall::FetchFile("pom.xml".into())]);
}

#[test]
fn test_bytes_are_fetched_on_demand() {
    let (api, fs) = open_master();
    let file = fs.file(&fs.path("pom.xml", &[]).unwrap()).unwrap();
    assert!(!api
        .calls()
        .iter()
        .any(|c| matches!(c, RemoteCall::OpenFile(_))));

    file.read_all().unwrap();
    file.read_all().unwrap();
    let opens = api
        .calls()
        .iter()
        .filter(|c| matches!(c, RemoteCall::OpenFile(_)))
        .count();
    assert_eq!(opens, 2);
}

#[test]
fn test_directory_is_materialized_up_front() {
    let (api, fs) = open_master();
    let entry = fs.resolve(&fs.path("src", &[]).unwrap()).unwrap();
    let calls = api.calls();
    assert_eq!(calls[0], RemoteCall::FetchFile("src".into()));
    assert_eq!(calls[1], RemoteCall::FetchDirectory("src".into()));
    // src, src/main, src/main/java, .../fr, .../gnodet, .../githubfs, and the same under src/test
    assert_eq!(listings(&calls), 11);

    api.clear_calls();
    let dir = entry.as_directory().unwrap();
    let test_class = dir
        .lookup("src/test/java/fr/gnodet/githubfs/GitHubFileSystemTest.java")
        .unwrap();
    assert_eq!(test_class.as_file().unwrap().size(), 29);
    assert!(dir.lookup("src/test/java/missing").is_none());
    assert!(api.calls().is_empty());
}

#[test]
fn test_resolver_lists_refs_once_per_call() {
    let api = populated_api();
    let resolver = ContentResolver::new(api.clone(), FileSystemId::new());
    let root = RepoPath::root_of(resolver.file_system());
    let entry = resolver.resolve(&repository(), None, &root).unwrap();
    assert_eq!(entry.revision(), MASTER);
    assert_eq!(entry.canonicalize(), "github:gnodet/githubfs@refs%2Fheads%2Fmaster");

    let refs = api
        .calls()
        .iter()
        .filter(|c| matches!(c, RemoteCall::ListRefs(_)))
        .count();
    assert_eq!(refs, 1);
}

#[test]
fn test_children_share_revision() {
    let (_api, fs) = open_master();
    let entry = fs.resolve(&fs.path("/", &[]).unwrap()).unwrap();
    let dir = entry.as_directory().unwrap();
    for child in dir.children() {
        assert_eq!(child.revision(), MASTER);
        assert_eq!(child.repository(), &repository());
    }
}
