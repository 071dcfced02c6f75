//! Shared fixtures: an in-memory copy of a small Maven project, and a wrapper
//! that injects remote failures into it.

use githubfs::remote::{ContentStream, RemoteEntry, RemoteFile};
use githubfs::{ContentApi, GitHubFileSystem, MemoryContentApi, NodeKind, RemoteError, Repository};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

pub const MASTER: &str = "refs/heads/master";
pub const RELEASE: &str = "refs/tags/githubfs-1.0.0";

pub fn repository() -> Repository {
    Repository::new("gnodet", "githubfs")
}

/// `master` and a release tag with slightly different trees.
pub fn populated_api() -> Arc<MemoryContentApi> {
    let repo = repository();
    let api = Arc::new(MemoryContentApi::new());
    api.add_file(&repo, MASTER, "pom.xml", b"<project/>");
    api.add_file(&repo, MASTER, "README.md", b"# githubfs\n");
    api.add_file(
        &repo,
        MASTER,
        "src/main/java/fr/gnodet/githubfs/GitHubFileSystem.java",
        b"public class GitHubFileSystem {}",
    );
    api.add_file(
        &repo,
        MASTER,
        "src/test/java/fr/gnodet/githubfs/GitHubFileSystemTest.java",
        b"class GitHubFileSystemTest {}",
    );
    api.add_directory(&repo, MASTER, "docs");
    api.add_file(&repo, RELEASE, "pom.xml", b"<project><version>1.0.0</version></project>");
    api
}

pub fn open_master() -> (Arc<MemoryContentApi>, GitHubFileSystem) {
    let api = populated_api();
    let fs = GitHubFileSystem::open(api.clone(), repository(), Some(MASTER)).unwrap();
    api.clear_calls();
    (api, fs)
}

/// Which call a [`Fault`] replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    FetchFile,
    FetchDirectory,
}

/// A failure to report instead of delegating.
#[derive(Debug, Clone, Copy)]
pub enum Fault {
    Unauthorized,
    RateLimited,
    Mismatch(NodeKind),
}

impl Fault {
    fn to_error(self, path: &str) -> RemoteError {
        match self {
            Fault::Unauthorized => RemoteError::Unauthorized("Bad credentials".into()),
            Fault::RateLimited => RemoteError::RateLimited("limit exhausted".into()),
            Fault::Mismatch(actual) => RemoteError::TypeMismatch {
                path: path.to_string(),
                actual,
            },
        }
    }
}

/// Wraps a [`MemoryContentApi`] and fails chosen calls on chosen paths.
///
/// Calls that are not overridden reach the inner API and show up in its call log.
pub struct FaultyContentApi {
    inner: Arc<MemoryContentApi>,
    faults: Mutex<HashMap<(Operation, String), Fault>>,
}

impl FaultyContentApi {
    pub fn new(inner: Arc<MemoryContentApi>) -> Self {
        Self {
            inner,
            faults: Mutex::new(HashMap::new()),
        }
    }

    pub fn fail(&self, operation: Operation, path: &str, fault: Fault) {
        self.faults
            .lock()
            .insert((operation, path.to_string()), fault);
    }

    fn fault(&self, operation: Operation, path: &str) -> Option<RemoteError> {
        self.faults
            .lock()
            .get(&(operation, path.to_string()))
            .map(|fault| fault.to_error(path))
    }
}

impl ContentApi for FaultyContentApi {
    fn list_refs(&self, repository: &Repository) -> Result<Vec<String>, RemoteError> {
        self.inner.list_refs(repository)
    }

    fn fetch_file(
        &self,
        repository: &Repository,
        revision: &str,
        path: &str,
    ) -> Result<RemoteFile, RemoteError> {
        match self.fault(Operation::FetchFile, path) {
            Some(err) => Err(err),
            None => self.inner.fetch_file(repository, revision, path),
        }
    }

    fn fetch_directory(
        &self,
        repository: &Repository,
        revision: &str,
        path: &str,
    ) -> Result<Vec<RemoteEntry>, RemoteError> {
        match self.fault(Operation::FetchDirectory, path) {
            Some(err) => Err(err),
            None => self.inner.fetch_directory(repository, revision, path),
        }
    }

    fn open_file(
        &self,
        repository: &Repository,
        revision: &str,
        path: &str,
    ) -> Result<ContentStream, RemoteError> {
        self.inner.open_file(repository, revision, path)
    }
}

/// The populated `master` tree behind a [`FaultyContentApi`], with the call log cleared.
pub fn open_faulty_master() -> (Arc<MemoryContentApi>, Arc<FaultyContentApi>, GitHubFileSystem) {
    let inner = populated_api();
    let faulty = Arc::new(FaultyContentApi::new(inner.clone()));
    let fs = GitHubFileSystem::open(faulty.clone(), repository(), Some(MASTER)).unwrap();
    inner.clear_calls();
    (inner, faulty, fs)
}
