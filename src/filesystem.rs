//! Read-only filesystem handle
//!
//! Binds one repository and one revision (resolved when the handle is opened)
//! and exposes path construction, reads, listings and attributes. Every
//! mutating operation fails with [`FsError::ReadOnly`].

use crate::content::{BasicAttributes, ByteChannel, ContentEntry, DirectoryContent, FileContent};
use crate::error::FsError;
use crate::identity::{Repository, RepositoryIdentity};
use crate::path::{FileSystemId, RepoPath};
use crate::remote::{ContentApi, ContentStream};
use crate::resolver::ContentResolver;
use crate::uri::FsLocator;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::info;

pub const SEPARATOR: &str = "/";

/// A repository at a fixed revision, viewed as a filesystem.
pub struct GitHubFileSystem {
    id: FileSystemId,
    repository: Repository,
    revision: String,
    resolver: ContentResolver,
}

impl GitHubFileSystem {
    /// Open `repository`, resolving `revision` (or the first listed ref).
    pub fn open(
        api: Arc<dyn ContentApi>,
        repository: Repository,
        revision: Option<&str>,
    ) -> Result<Self, FsError> {
        let id = FileSystemId::new();
        let root = RepositoryIdentity::resolve(api.as_ref(), &repository, revision, None, id)?;
        let revision = root.revision().to_string();
        info!(repository = %repository, revision = %revision, "Opened filesystem");
        Ok(Self {
            id,
            repository,
            revision,
            resolver: ContentResolver::new(api, id),
        })
    }

    /// Open the filesystem a locator names and return the path it points at.
    pub fn open_locator(
        api: Arc<dyn ContentApi>,
        locator: &FsLocator,
    ) -> Result<(Self, RepoPath), FsError> {
        let fs = Self::open(api, locator.repository.clone(), locator.revision.as_deref())?;
        let path = fs.path(&locator.path, &[])?;
        Ok((fs, path))
    }

    pub fn id(&self) -> FileSystemId {
        self.id
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    pub fn revision(&self) -> &str {
        &self.revision
    }

    pub fn separator(&self) -> &'static str {
        SEPARATOR
    }

    pub fn is_read_only(&self) -> bool {
        true
    }

    pub fn is_open(&self) -> bool {
        true
    }

    pub fn root_directories(&self) -> Vec<RepoPath> {
        vec![RepoPath::root_of(self.id)]
    }

    /// Join `first` and the non-empty `more` segments with `/`.
    pub fn path(&self, first: &str, more: &[&str]) -> Result<RepoPath, FsError> {
        let mut joined = first.to_string();
        for segment in more.iter().filter(|s| !s.is_empty()) {
            if !joined.is_empty() {
                joined.push('/');
            }
            joined.push_str(segment);
        }
        RepoPath::new(self.id, &joined)
    }

    fn identity(&self, path: &RepoPath) -> RepositoryIdentity {
        RepositoryIdentity::from_parts(
            self.repository.clone(),
            self.revision.clone(),
            path.to_relative_string(),
            self.id,
        )
    }

    pub fn resolve(&self, path: &RepoPath) -> Result<ContentEntry, FsError> {
        self.resolver.resolve_identity(self.identity(path), path)
    }

    pub fn file(&self, path: &RepoPath) -> Result<FileContent, FsError> {
        self.resolver.file_at(self.identity(path), path)
    }

    pub fn directory(&self, path: &RepoPath) -> Result<DirectoryContent, FsError> {
        self.resolver.directory_at(self.identity(path), path)
    }

    pub fn open_read(&self, path: &RepoPath) -> Result<ContentStream, FsError> {
        self.file(path)?.open()
    }

    pub fn read_all(&self, path: &RepoPath) -> Result<Vec<u8>, FsError> {
        self.file(path)?.read_all()
    }

    pub fn new_byte_channel(&self, path: &RepoPath) -> Result<ByteChannel, FsError> {
        self.file(path)?.open_channel()
    }

    /// Immediate children of a directory.
    pub fn read_directory(&self, path: &RepoPath) -> Result<BTreeSet<RepoPath>, FsError> {
        Ok(self.directory(path)?.child_paths())
    }

    pub fn attributes(&self, path: &RepoPath) -> Result<BasicAttributes, FsError> {
        Ok(self.resolve(path)?.attributes())
    }

    /// Fails with `NotFound` unless something exists at `path`.
    pub fn check_access(&self, path: &RepoPath) -> Result<(), FsError> {
        self.resolve(path).map(|_| ())
    }

    /// Absolute, normalized form of a path that exists.
    pub fn to_real_path(&self, path: &RepoPath) -> Result<RepoPath, FsError> {
        let real = path.to_absolute_path().normalize();
        self.check_access(&real)?;
        Ok(real)
    }

    pub fn write(&self, _path: &RepoPath, _data: &[u8]) -> Result<(), FsError> {
        Err(FsError::ReadOnly)
    }

    pub fn create_directory(&self, _path: &RepoPath) -> Result<(), FsError> {
        Err(FsError::ReadOnly)
    }

    pub fn delete(&self, _path: &RepoPath) -> Result<(), FsError> {
        Err(FsError::ReadOnly)
    }

    pub fn copy(&self, _source: &RepoPath, _target: &RepoPath) -> Result<(), FsError> {
        Err(FsError::ReadOnly)
    }

    pub fn move_path(&self, _source: &RepoPath, _target: &RepoPath) -> Result<(), FsError> {
        Err(FsError::ReadOnly)
    }
}

impl std::fmt::Debug for GitHubFileSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubFileSystem")
            .field("id", &self.id)
            .field("repository", &self.repository)
            .field("revision", &self.revision)
            .finish()
    }
}
