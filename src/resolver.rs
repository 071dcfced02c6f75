//! Content resolution
//!
//! Decides whether a path names a file or a directory. The content API only
//! says so after the fact: a file fetch on a directory fails with a type
//! mismatch, and the resolver then lists the directory instead.
//!
//! Resolving a directory materializes its whole subtree before returning.
//! The cost is one listing per directory below the requested one, not one per
//! call; callers that only need immediate children still pay for the subtree.

use crate::content::{ContentEntry, DirectoryContent, FileContent};
use crate::error::{FsError, RemoteError};
use crate::identity::{Repository, RepositoryIdentity};
use crate::path::{FileSystemId, RepoPath};
use crate::remote::{ContentApi, RemoteEntry, RemoteKind};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Builds [`ContentEntry`] values from remote lookups.
///
/// Nothing is cached: every call goes back to the content API.
#[derive(Clone)]
pub struct ContentResolver {
    api: Arc<dyn ContentApi>,
    fs: FileSystemId,
}

impl ContentResolver {
    pub fn new(api: Arc<dyn ContentApi>, fs: FileSystemId) -> Self {
        Self { api, fs }
    }

    pub fn file_system(&self) -> FileSystemId {
        self.fs
    }

    /// Resolve `path` to whichever variant exists at `revision`.
    pub fn resolve(
        &self,
        repository: &Repository,
        revision: Option<&str>,
        path: &RepoPath,
    ) -> Result<ContentEntry, FsError> {
        let identity = self.identify(repository, revision, path)?;
        self.resolve_identity(identity, path)
    }

    /// Resolve a path that must be a file.
    pub fn wrap_file(
        &self,
        repository: &Repository,
        revision: Option<&str>,
        path: &RepoPath,
    ) -> Result<FileContent, FsError> {
        let identity = self.identify(repository, revision, path)?;
        self.file_at(identity, path)
    }

    /// Resolve a path that must be a directory, with its subtree.
    pub fn wrap_directory(
        &self,
        repository: &Repository,
        revision: Option<&str>,
        path: &RepoPath,
    ) -> Result<DirectoryContent, FsError> {
        let identity = self.identify(repository, revision, path)?;
        self.directory_at(identity, path)
    }

    fn identify(
        &self,
        repository: &Repository,
        revision: Option<&str>,
        path: &RepoPath,
    ) -> Result<RepositoryIdentity, FsError> {
        self.check_path(path)?;
        let subpath = path.to_relative_string();
        RepositoryIdentity::resolve(
            self.api.as_ref(),
            repository,
            revision,
            Some(subpath.as_str()),
            self.fs,
        )
    }

    fn check_path(&self, path: &RepoPath) -> Result<(), FsError> {
        if path.file_system() != self.fs {
            return Err(FsError::invalid_path(
                path.to_str_lossy(),
                "path belongs to a different filesystem",
            ));
        }
        Ok(())
    }

    /// Resolve against an already resolved coordinate.
    pub(crate) fn resolve_identity(
        &self,
        identity: RepositoryIdentity,
        path: &RepoPath,
    ) -> Result<ContentEntry, FsError> {
        self.check_path(path)?;
        let fetched = self.api.fetch_file(
            identity.repository(),
            identity.revision(),
            identity.subpath(),
        );
        match fetched {
            Ok(file) => Ok(ContentEntry::File(FileContent::new(
                identity,
                path.clone(),
                file.size,
                Arc::clone(&self.api),
            ))),
            Err(RemoteError::TypeMismatch { .. }) => {
                debug!(coordinate = %identity, "Not a file, listing as directory");
                // Neither shape matched if this listing mismatches too: NotFound.
                let listing = self.list(&identity)?;
                self.materialize(identity, path, listing).map(ContentEntry::Directory)
            }
            Err(err) => Err(err.into()),
        }
    }

    pub(crate) fn file_at(
        &self,
        identity: RepositoryIdentity,
        path: &RepoPath,
    ) -> Result<FileContent, FsError> {
        self.check_path(path)?;
        let file = self
            .api
            .fetch_file(identity.repository(), identity.revision(), identity.subpath())
            .map_err(|err| match err {
                RemoteError::TypeMismatch { path, actual } => {
                    FsError::InvalidArgument(format!("{} is a {}, not a file", path, actual))
                }
                other => other.into(),
            })?;
        Ok(FileContent::new(
            identity,
            path.clone(),
            file.size,
            Arc::clone(&self.api),
        ))
    }

    /// List `identity` and materialize every child, descending into subdirectories.
    pub(crate) fn directory_at(
        &self,
        identity: RepositoryIdentity,
        path: &RepoPath,
    ) -> Result<DirectoryContent, FsError> {
        self.check_path(path)?;
        let listing = self.list(&identity).map_err(|err| match err {
            RemoteError::TypeMismatch { path, actual } => {
                FsError::InvalidArgument(format!("{} is a {}, not a directory", path, actual))
            }
            other => other.into(),
        })?;
        self.materialize(identity, path, listing)
    }

    fn list(&self, identity: &RepositoryIdentity) -> Result<Vec<RemoteEntry>, RemoteError> {
        self.api
            .fetch_directory(identity.repository(), identity.revision(), identity.subpath())
    }

    fn materialize(
        &self,
        identity: RepositoryIdentity,
        path: &RepoPath,
        listing: Vec<RemoteEntry>,
    ) -> Result<DirectoryContent, FsError> {
        let mut children = BTreeMap::new();
        for entry in listing {
            let child_path = RepoPath::new(self.fs, &entry.path)?;
            let child_identity = identity.with_subpath(&entry.path);
            let child = match entry.kind {
                RemoteKind::File { size } => ContentEntry::File(FileContent::new(
                    child_identity,
                    child_path.clone(),
                    size,
                    Arc::clone(&self.api),
                )),
                RemoteKind::Directory => {
                    // The parent said directory; a mismatch names this child as missing.
                    let nested = self.list(&child_identity)?;
                    let directory = self.materialize(child_identity, &child_path, nested)?;
                    ContentEntry::Directory(directory)
                }
            };
            children.insert(child_path, child);
        }
        debug!(coordinate = %identity, children = children.len(), "Materialized directory");
        Ok(DirectoryContent::new(identity, path.clone(), children))
    }
}
