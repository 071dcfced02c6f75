//! Canonical identity strings and entry ordering

use super::test_utils::{open_master, populated_api, repository, RELEASE};
use githubfs::{FileSystemId, GitHubFileSystem, MemoryContentApi, Repository, RepositoryIdentity};
use std::collections::BTreeSet;
use std::sync::Arc;

#[test]
fn test_identity_for_tagged_file() {
    let repo = Repository::new("package-url", "packageurl-java");
    let api = MemoryContentApi::new();
    api.add_file(
        &repo,
        "refs/tags/packageurl-java-1.0.0",
        "pom.xml",
        b"<project/>",
    );
    let identity = RepositoryIdentity::resolve(
        &api,
        &repo,
        Some("refs/tags/packageurl-java-1.0.0"),
        Some("/pom.xml/"),
        FileSystemId::new(),
    )
    .unwrap();
    assert_eq!(
        identity.canonicalize(),
        "github:package-url/packageurl-java@refs%2Ftags%2Fpackageurl-java-1.0.0#pom.xml"
    );
    assert_eq!(identity.subpath(), "pom.xml");
    assert_eq!(identity.canonical_path().to_string(), "pom.xml");
}

#[test]
fn test_same_node_same_identity() {
    let (_api, fs) = open_master();
    let direct = fs
        .resolve(&fs.path("src/main/java", &[]).unwrap())
        .unwrap();
    let via_parent = fs.resolve(&fs.path("src", &[]).unwrap()).unwrap();
    let nested = via_parent
        .as_directory()
        .unwrap()
        .lookup("src/main/java")
        .unwrap();
    assert_eq!(direct.identity(), nested.identity());
    assert_eq!(direct.canonicalize(), nested.canonicalize());
}

#[test]
fn test_equivalent_paths_canonicalize_alike() {
    let (_api, fs) = open_master();
    let plain = fs.resolve(&fs.path("/src/main", &[]).unwrap()).unwrap();
    let slashed = fs.resolve(&fs.path("src//main/", &[]).unwrap()).unwrap();
    assert_eq!(plain.canonicalize(), slashed.canonicalize());
}

#[test]
fn test_entries_order_by_revision_then_path() {
    let api = populated_api();
    let master = GitHubFileSystem::open(api.clone(), repository(), None).unwrap();
    let release = GitHubFileSystem::open(api, repository(), Some(RELEASE)).unwrap();

    let mut entries = BTreeSet::new();
    entries.insert(master.resolve(&master.path("pom.xml", &[]).unwrap()).unwrap());
    entries.insert(master.resolve(&master.path("README.md", &[]).unwrap()).unwrap());
    entries.insert(release.resolve(&release.path("pom.xml", &[]).unwrap()).unwrap());

    let order: Vec<String> = entries.iter().map(|e| e.canonicalize().to_string()).collect();
    assert_eq!(
        order,
        vec![
            "github:gnodet/githubfs@refs%2Fheads%2Fmaster#README.md",
            "github:gnodet/githubfs@refs%2Fheads%2Fmaster#pom.xml",
            "github:gnodet/githubfs@refs%2Ftags%2Fgithubfs-1.0.0#pom.xml",
        ]
    );
}

#[test]
fn test_other_repository_orders_by_full_name() {
    let api = Arc::new(MemoryContentApi::new());
    let alpha = Repository::new("alpha", "zeta");
    let beta = Repository::new("beta", "alpha");
    api.add_file(&alpha, "main", "a", b"1");
    api.add_file(&beta, "main", "a", b"2");

    let a = GitHubFileSystem::open(api.clone(), alpha, None).unwrap();
    let b = GitHubFileSystem::open(api, beta, None).unwrap();
    let ea = a.resolve(&a.path("a", &[]).unwrap()).unwrap();
    let eb = b.resolve(&b.path("a", &[]).unwrap()).unwrap();
    assert!(ea < eb);
    assert_ne!(ea, eb);
}

#[test]
fn test_repository_case_does_not_split_identities() {
    let api = Arc::new(MemoryContentApi::new());
    let mixed = Repository::new("Gnodet", "GitHubFS");
    api.add_file(&mixed, "refs/heads/master", "src/Main.java", b"class Main {}");
    api.add_file(&repository(), "refs/heads/master", "src/Main.java", b"class Main {}");

    let a = GitHubFileSystem::open(api.clone(), mixed, None).unwrap();
    let b = GitHubFileSystem::open(api, repository(), None).unwrap();
    let ea = a.resolve(&a.path("src/Main.java", &[]).unwrap()).unwrap();
    let eb = b.resolve(&b.path("src/Main.java", &[]).unwrap()).unwrap();
    assert_eq!(
        ea.canonicalize(),
        "github:gnodet/githubfs@refs%2Fheads%2Fmaster#src/Main.java"
    );
    assert_eq!(ea.identity(), eb.identity());
    assert_eq!(ea, eb);
}
