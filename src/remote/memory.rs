//! In-memory content API
//!
//! Holds file trees per repository and revision and records every call made
//! against it, so tests can assert how many round trips an operation costs.

use super::{ContentApi, ContentStream, RemoteEntry, RemoteFile, RemoteKind};
use crate::error::{NodeKind, RemoteError};
use crate::identity::Repository;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::io::Cursor;

/// A call received by [`MemoryContentApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCall {
    ListRefs(String),
    FetchFile(String),
    FetchDirectory(String),
    OpenFile(String),
}

#[derive(Debug, Clone)]
enum Node {
    File(Vec<u8>),
    Directory,
}

#[derive(Debug, Default)]
struct RepositoryData {
    refs: Vec<String>,
    /// revision -> path -> node; the root directory is implicit.
    trees: HashMap<String, BTreeMap<String, Node>>,
}

/// Content API backed by in-memory trees.
#[derive(Debug, Default)]
pub struct MemoryContentApi {
    repositories: Mutex<HashMap<Repository, RepositoryData>>,
    calls: Mutex<Vec<RemoteCall>>,
}

fn trim(path: &str) -> &str {
    path.trim_matches('/')
}

fn parent_of(path: &str) -> &str {
    path.rsplit_once('/').map_or("", |(parent, _)| parent)
}

impl MemoryContentApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a repository with no refs.
    pub fn add_repository(&self, repository: &Repository) {
        self.repositories
            .lock()
            .entry(repository.clone())
            .or_default();
    }

    /// Append a ref to the repository's listing.
    pub fn add_ref(&self, repository: &Repository, revision: &str) {
        let mut repositories = self.repositories.lock();
        tree_mut(&mut repositories, repository, revision);
    }

    /// Add a file, creating its ref and parent directories as needed.
    pub fn add_file(&self, repository: &Repository, revision: &str, path: &str, contents: &[u8]) {
        let mut repositories = self.repositories.lock();
        let tree = tree_mut(&mut repositories, repository, revision);
        let path = trim(path);
        insert_parents(tree, parent_of(path));
        tree.insert(path.to_string(), Node::File(contents.to_vec()));
    }

    /// Add an empty directory, creating its ref and parents as needed.
    pub fn add_directory(&self, repository: &Repository, revision: &str, path: &str) {
        let mut repositories = self.repositories.lock();
        insert_parents(tree_mut(&mut repositories, repository, revision), trim(path));
    }

    /// Calls received so far, oldest first.
    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    fn record(&self, call: RemoteCall) {
        self.calls.lock().push(call);
    }

    fn with_tree<T>(
        &self,
        repository: &Repository,
        revision: &str,
        f: impl FnOnce(&BTreeMap<String, Node>) -> Result<T, RemoteError>,
    ) -> Result<T, RemoteError> {
        let repositories = self.repositories.lock();
        let data = repositories
            .get(repository)
            .ok_or_else(|| RemoteError::NotFound(repository.full_name()))?;
        let tree = data.trees.get(revision).ok_or_else(|| {
            RemoteError::NotFound(format!("{}@{}", repository.full_name(), revision))
        })?;
        f(tree)
    }
}

/// Tree of `revision`, registering the repository and ref on first use.
fn tree_mut<'a>(
    repositories: &'a mut HashMap<Repository, RepositoryData>,
    repository: &Repository,
    revision: &str,
) -> &'a mut BTreeMap<String, Node> {
    let data = repositories.entry(repository.clone()).or_default();
    if !data.refs.iter().any(|r| r == revision) {
        data.refs.push(revision.to_string());
    }
    data.trees.entry(revision.to_string()).or_default()
}

fn insert_parents(tree: &mut BTreeMap<String, Node>, dir: &str) {
    let mut current = dir;
    while !current.is_empty() {
        tree.entry(current.to_string()).or_insert(Node::Directory);
        current = parent_of(current);
    }
}

impl ContentApi for MemoryContentApi {
    fn list_refs(&self, repository: &Repository) -> Result<Vec<String>, RemoteError> {
        self.record(RemoteCall::ListRefs(repository.full_name()));
        self.repositories
            .lock()
            .get(repository)
            .map(|data| data.refs.clone())
            .ok_or_else(|| RemoteError::NotFound(repository.full_name()))
    }

    fn fetch_file(
        &self,
        repository: &Repository,
        revision: &str,
        path: &str,
    ) -> Result<RemoteFile, RemoteError> {
        let path = trim(path);
        self.record(RemoteCall::FetchFile(path.to_string()));
        self.with_tree(repository, revision, |tree| match tree.get(path) {
            Some(Node::File(bytes)) => Ok(RemoteFile {
                path: path.to_string(),
                size: bytes.len() as u64,
            }),
            Some(Node::Directory) => Err(RemoteError::TypeMismatch {
                path: path.to_string(),
                actual: NodeKind::Directory,
            }),
            None if path.is_empty() => Err(RemoteError::TypeMismatch {
                path: path.to_string(),
                actual: NodeKind::Directory,
            }),
            None => Err(RemoteError::NotFound(path.to_string())),
        })
    }

    fn fetch_directory(
        &self,
        repository: &Repository,
        revision: &str,
        path: &str,
    ) -> Result<Vec<RemoteEntry>, RemoteError> {
        let path = trim(path);
        self.record(RemoteCall::FetchDirectory(path.to_string()));
        self.with_tree(repository, revision, |tree| {
            match tree.get(path) {
                Some(Node::File(_)) => {
                    return Err(RemoteError::TypeMismatch {
                        path: path.to_string(),
                        actual: NodeKind::File,
                    })
                }
                None if !path.is_empty() => {
                    return Err(RemoteError::NotFound(path.to_string()))
                }
                _ => {}
            }
            Ok(tree
                .iter()
                .filter(|(child, _)| parent_of(child) == path)
                .map(|(child, node)| RemoteEntry {
                    path: child.clone(),
                    kind: match node {
                        Node::File(bytes) => RemoteKind::File {
                            size: bytes.len() as u64,
                        },
                        Node::Directory => RemoteKind::Directory,
                    },
                })
                .collect())
        })
    }

    fn open_file(
        &self,
        repository: &Repository,
        revision: &str,
        path: &str,
    ) -> Result<ContentStream, RemoteError> {
        let path = trim(path);
        self.record(RemoteCall::OpenFile(path.to_string()));
        self.with_tree(repository, revision, |tree| match tree.get(path) {
            Some(Node::File(bytes)) => Ok(Box::new(Cursor::new(bytes.clone())) as ContentStream),
            Some(Node::Directory) => Err(RemoteError::TypeMismatch {
                path: path.to_string(),
                actual: NodeKind::Directory,
            }),
            None => Err(RemoteError::NotFound(path.to_string())),
        })
    }
}
