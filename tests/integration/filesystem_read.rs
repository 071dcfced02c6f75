//! Reading files and listing directories through the filesystem handle

use super::test_utils::{open_master, populated_api, repository, MASTER, RELEASE};
use githubfs::{FsError, FsLocator, GitHubFileSystem};
use std::io::{Read, Seek, SeekFrom};

#[test]
fn test_read_file_bytes() {
    let (_api, fs) = open_master();
    let pom = fs.path("/pom.xml", &[]).unwrap();
    assert_eq!(fs.read_all(&pom).unwrap(), b"<project/>");

    let mut stream = fs.open_read(&pom).unwrap();
    let mut text = String::new();
    stream.read_to_string(&mut text).unwrap();
    assert_eq!(text, "<project/>");
}

#[test]
fn test_each_open_is_a_fresh_stream() {
    let (_api, fs) = open_master();
    let readme = fs.path("README.md", &[]).unwrap();
    let file = fs.file(&readme).unwrap();

    let mut first = String::new();
    file.open().unwrap().read_to_string(&mut first).unwrap();
    let mut second = String::new();
    file.open().unwrap().read_to_string(&mut second).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_byte_channel_seeks() {
    let (_api, fs) = open_master();
    let readme = fs.path("README.md", &[]).unwrap();
    let mut channel = fs.new_byte_channel(&readme).unwrap();
    assert_eq!(channel.size(), 11);

    channel.seek(SeekFrom::Start(2)).unwrap();
    let mut rest = String::new();
    channel.read_to_string(&mut rest).unwrap();
    assert_eq!(rest, "githubfs\n");
    assert_eq!(channel.position(), 11);
}

#[test]
fn test_list_root_and_nested_directories() {
    let (_api, fs) = open_master();
    let root = fs.root_directories().remove(0);
    let names: Vec<String> = fs
        .read_directory(&root)
        .unwrap()
        .iter()
        .map(|p| p.to_string())
        .collect();
    assert_eq!(names, vec!["README.md", "docs", "pom.xml", "src"]);

    let docs = fs.path("docs", &[]).unwrap();
    assert!(fs.read_directory(&docs).unwrap().is_empty());

    let java = fs.path("src/main/java", &["fr", "gnodet"]).unwrap();
    let names: Vec<String> = fs
        .read_directory(&java)
        .unwrap()
        .iter()
        .map(|p| p.to_string())
        .collect();
    assert_eq!(names, vec!["src/main/java/fr/gnodet/githubfs"]);
}

#[test]
fn test_attributes() {
    let (_api, fs) = open_master();
    let pom = fs.attributes(&fs.path("pom.xml", &[]).unwrap()).unwrap();
    assert!(pom.is_regular_file());
    assert!(!pom.is_directory());
    assert!(!pom.is_symbolic_link());
    assert_eq!(pom.size(), 10);
    assert!(pom.last_modified_time().is_none());

    let src = fs.attributes(&fs.path("src", &[]).unwrap()).unwrap();
    assert!(src.is_directory());
    assert_eq!(src.size(), -1);
    assert_eq!(
        src.file_key().canonicalize(),
        "github:gnodet/githubfs@refs%2Fheads%2Fmaster#src"
    );
}

#[test]
fn test_revisions_are_isolated() {
    let api = populated_api();
    let release = GitHubFileSystem::open(api.clone(), repository(), Some(RELEASE)).unwrap();
    let pom = release.path("pom.xml", &[]).unwrap();
    assert_eq!(
        release.read_all(&pom).unwrap(),
        b"<project><version>1.0.0</version></project>"
    );
    let readme = release.path("README.md", &[]).unwrap();
    assert!(matches!(release.resolve(&readme), Err(FsError::NotFound(_))));

    let master = GitHubFileSystem::open(api, repository(), None).unwrap();
    assert_eq!(master.revision(), MASTER);
}

#[test]
fn test_open_from_locator() {
    let locator =
        FsLocator::parse("github:gnodet/githubfs?revision=refs%2Ftags%2Fgithubfs-1.0.0!/pom.xml")
            .unwrap();
    let (fs, path) = GitHubFileSystem::open_locator(populated_api(), &locator).unwrap();
    assert_eq!(fs.revision(), RELEASE);
    assert_eq!(path.to_string(), "/pom.xml");
    assert!(fs.resolve(&path).unwrap().is_file());
}

#[test]
fn test_missing_paths() {
    let (_api, fs) = open_master();
    let missing = fs.path("nope/nothing.txt", &[]).unwrap();
    assert!(matches!(fs.check_access(&missing), Err(FsError::NotFound(_))));
    assert!(matches!(fs.read_all(&missing), Err(FsError::NotFound(_))));

    let err: std::io::Error = fs.read_all(&missing).unwrap_err().into();
    assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
}

#[test]
fn test_wrong_kind() {
    let (_api, fs) = open_master();
    let src = fs.path("src", &[]).unwrap();
    assert!(matches!(fs.read_all(&src), Err(FsError::InvalidArgument(_))));
    let pom = fs.path("pom.xml", &[]).unwrap();
    assert!(matches!(
        fs.read_directory(&pom),
        Err(FsError::InvalidArgument(_))
    ));
}
