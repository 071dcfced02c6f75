//! Remote Content API
//!
//! The narrow interface the filesystem needs from a hosted repository:
//! list refs, fetch one file's metadata, list one directory, and stream a
//! file's bytes. Calls are blocking and attempted exactly once.

use crate::error::RemoteError;
use crate::identity::Repository;
use std::io::Read;
use std::sync::Arc;

pub mod github;
pub mod memory;

pub use github::GitHubContentApi;
pub use memory::MemoryContentApi;

/// Readable byte stream over one file's contents.
pub type ContentStream = Box<dyn Read + Send>;

/// Metadata of a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    /// Repository-relative path.
    pub path: String,
    pub size: u64,
}

/// What a directory listing reports about a child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteKind {
    File { size: u64 },
    Directory,
}

/// One child of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    /// Repository-relative path of the child, e.g. `src/main`.
    pub path: String,
    pub kind: RemoteKind,
}

impl RemoteEntry {
    pub fn is_file(&self) -> bool {
        matches!(self.kind, RemoteKind::File { .. })
    }
}

/// Content API client trait
///
/// `fetch_file` on a directory and `fetch_directory` on a file must fail with
/// [`RemoteError::TypeMismatch`]; the resolver relies on that signal.
pub trait ContentApi: Send + Sync {
    /// All refs of the repository, in listing order.
    fn list_refs(&self, repository: &Repository) -> Result<Vec<String>, RemoteError>;

    fn fetch_file(
        &self,
        repository: &Repository,
        revision: &str,
        path: &str,
    ) -> Result<RemoteFile, RemoteError>;

    fn fetch_directory(
        &self,
        repository: &Repository,
        revision: &str,
        path: &str,
    ) -> Result<Vec<RemoteEntry>, RemoteError>;

    /// Open a fresh stream over a file's bytes.
    fn open_file(
        &self,
        repository: &Repository,
        revision: &str,
        path: &str,
    ) -> Result<ContentStream, RemoteError>;
}

impl<T: ContentApi + ?Sized> ContentApi for Arc<T> {
    fn list_refs(&self, repository: &Repository) -> Result<Vec<String>, RemoteError> {
        (**self).list_refs(repository)
    }

    fn fetch_file(
        &self,
        repository: &Repository,
        revision: &str,
        path: &str,
    ) -> Result<RemoteFile, RemoteError> {
        (**self).fetch_file(repository, revision, path)
    }

    fn fetch_directory(
        &self,
        repository: &Repository,
        revision: &str,
        path: &str,
    ) -> Result<Vec<RemoteEntry>, RemoteError> {
        (**self).fetch_directory(repository, revision, path)
    }

    fn open_file(
        &self,
        repository: &Repository,
        revision: &str,
        path: &str,
    ) -> Result<ContentStream, RemoteError> {
        (**self).open_file(repository, revision, path)
    }
}
