//! Resolved filesystem nodes
//!
//! A `ContentEntry` is either a file (size plus a fresh byte stream per
//! access) or a directory (the set of its immediate children, already
//! materialized). Identity, equality and ordering come from the coordinate.

use crate::error::FsError;
use crate::identity::{Repository, RepositoryIdentity};
use crate::path::RepoPath;
use crate::remote::{ContentApi, ContentStream};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};
use std::sync::Arc;
use std::time::SystemTime;

/// Basic attributes of a node.
///
/// Timestamps are unknown for remote content and always `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicAttributes {
    is_regular_file: bool,
    is_directory: bool,
    size: i64,
    file_key: RepositoryIdentity,
}

impl BasicAttributes {
    pub fn is_regular_file(&self) -> bool {
        self.is_regular_file
    }

    pub fn is_directory(&self) -> bool {
        self.is_directory
    }

    pub fn is_symbolic_link(&self) -> bool {
        false
    }

    pub fn is_other(&self) -> bool {
        false
    }

    /// Byte length for files, `-1` for directories.
    pub fn size(&self) -> i64 {
        self.size
    }

    /// Opaque key; two attributes with equal keys describe the same node.
    pub fn file_key(&self) -> &RepositoryIdentity {
        &self.file_key
    }

    pub fn last_modified_time(&self) -> Option<SystemTime> {
        None
    }

    pub fn last_access_time(&self) -> Option<SystemTime> {
        None
    }

    pub fn creation_time(&self) -> Option<SystemTime> {
        None
    }
}

/// A regular file.
#[derive(Clone)]
pub struct FileContent {
    identity: RepositoryIdentity,
    path: RepoPath,
    size: u64,
    api: Arc<dyn ContentApi>,
}

impl FileContent {
    pub(crate) fn new(
        identity: RepositoryIdentity,
        path: RepoPath,
        size: u64,
        api: Arc<dyn ContentApi>,
    ) -> Self {
        Self {
            identity,
            path,
            size,
            api,
        }
    }

    pub fn identity(&self) -> &RepositoryIdentity {
        &self.identity
    }

    pub fn path(&self) -> &RepoPath {
        &self.path
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Open a new stream over the file's bytes. Every call goes to the remote side.
    pub fn open(&self) -> Result<ContentStream, FsError> {
        Ok(self.api.open_file(
            self.identity.repository(),
            self.identity.revision(),
            self.identity.subpath(),
        )?)
    }

    pub fn read_all(&self) -> Result<Vec<u8>, FsError> {
        let mut buf = Vec::with_capacity(self.size as usize);
        self.open()?.read_to_end(&mut buf)?;
        Ok(buf)
    }

    /// Read the file into a seekable, read-only channel.
    pub fn open_channel(&self) -> Result<ByteChannel, FsError> {
        Ok(ByteChannel::new(self.read_all()?))
    }

    pub fn write(&self, _data: &[u8]) -> Result<(), FsError> {
        Err(FsError::ReadOnly)
    }

    pub fn append(&self, _data: &[u8]) -> Result<(), FsError> {
        Err(FsError::ReadOnly)
    }

    pub fn truncate(&self, _size: u64) -> Result<(), FsError> {
        Err(FsError::ReadOnly)
    }

    pub fn attributes(&self) -> BasicAttributes {
        BasicAttributes {
            is_regular_file: true,
            is_directory: false,
            size: self.size as i64,
            file_key: self.identity.clone(),
        }
    }
}

impl fmt::Debug for FileContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileContent")
            .field("identity", &self.identity)
            .field("path", &self.path)
            .field("size", &self.size)
            .finish()
    }
}

impl fmt::Display for FileContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileContent [{}, size={} KB]", self.identity, self.size / 1024)
    }
}

/// A directory and its fully resolved subtree.
#[derive(Debug, Clone)]
pub struct DirectoryContent {
    identity: RepositoryIdentity,
    path: RepoPath,
    children: BTreeMap<RepoPath, ContentEntry>,
}

impl DirectoryContent {
    pub(crate) fn new(
        identity: RepositoryIdentity,
        path: RepoPath,
        children: BTreeMap<RepoPath, ContentEntry>,
    ) -> Self {
        Self {
            identity,
            path,
            children,
        }
    }

    pub fn identity(&self) -> &RepositoryIdentity {
        &self.identity
    }

    pub fn path(&self) -> &RepoPath {
        &self.path
    }

    /// Paths of the immediate children, repository-relative.
    pub fn child_paths(&self) -> BTreeSet<RepoPath> {
        self.children.keys().cloned().collect()
    }

    pub fn children(&self) -> impl Iterator<Item = &ContentEntry> {
        self.children.values()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn child(&self, path: &RepoPath) -> Option<&ContentEntry> {
        self.children.get(path)
    }

    /// Find a node anywhere below this directory without touching the remote side.
    pub fn lookup(&self, subpath: &str) -> Option<&ContentEntry> {
        let wanted = subpath.trim_matches('/');
        for child in self.children.values() {
            let own = child.identity().subpath();
            if own == wanted {
                return Some(child);
            }
            if let ContentEntry::Directory(dir) = child {
                let nested = wanted
                    .strip_prefix(own)
                    .is_some_and(|rest| rest.starts_with('/'));
                if nested {
                    return dir.lookup(wanted);
                }
            }
        }
        None
    }

    pub fn attributes(&self) -> BasicAttributes {
        BasicAttributes {
            is_regular_file: false,
            is_directory: true,
            size: -1,
            file_key: self.identity.clone(),
        }
    }
}

impl fmt::Display for DirectoryContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DirectoryContent [{}, item count={}]",
            self.identity,
            self.children.len()
        )
    }
}

/// A resolved node.
#[derive(Debug, Clone)]
pub enum ContentEntry {
    File(FileContent),
    Directory(DirectoryContent),
}

impl ContentEntry {
    pub fn identity(&self) -> &RepositoryIdentity {
        match self {
            ContentEntry::File(file) => file.identity(),
            ContentEntry::Directory(dir) => dir.identity(),
        }
    }

    pub fn repository(&self) -> &Repository {
        self.identity().repository()
    }

    pub fn revision(&self) -> &str {
        self.identity().revision()
    }

    /// Path the node was requested with.
    pub fn path(&self) -> &RepoPath {
        match self {
            ContentEntry::File(file) => file.path(),
            ContentEntry::Directory(dir) => dir.path(),
        }
    }

    /// Canonical identity string, e.g. `github:o/r@refs%2Fheads%2Fmain#src`.
    pub fn canonicalize(&self) -> &str {
        self.identity().canonicalize()
    }

    pub fn attributes(&self) -> BasicAttributes {
        match self {
            ContentEntry::File(file) => file.attributes(),
            ContentEntry::Directory(dir) => dir.attributes(),
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, ContentEntry::File(_))
    }

    pub fn is_directory(&self) -> bool {
        matches!(self, ContentEntry::Directory(_))
    }

    pub fn as_file(&self) -> Option<&FileContent> {
        match self {
            ContentEntry::File(file) => Some(file),
            ContentEntry::Directory(_) => None,
        }
    }

    pub fn as_directory(&self) -> Option<&DirectoryContent> {
        match self {
            ContentEntry::Directory(dir) => Some(dir),
            ContentEntry::File(_) => None,
        }
    }
}

impl PartialEq for ContentEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ContentEntry {}

impl Ord for ContentEntry {
    /// Same repository: by revision, then path text. Otherwise by repository full name.
    /// Repository names compare without case, as in the canonical form.
    fn cmp(&self, other: &Self) -> Ordering {
        let mine = self.repository().full_name().to_lowercase();
        let theirs = other.repository().full_name().to_lowercase();
        mine.cmp(&theirs).then_with(|| {
            self.revision()
                .cmp(other.revision())
                .then_with(|| self.path().to_str_lossy().cmp(&other.path().to_str_lossy()))
        })
    }
}

impl PartialOrd for ContentEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ContentEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentEntry::File(file) => fmt::Display::fmt(file, f),
            ContentEntry::Directory(dir) => fmt::Display::fmt(dir, f),
        }
    }
}

/// Seekable view over a file's bytes. Writes and truncation fail.
#[derive(Debug)]
pub struct ByteChannel {
    data: Cursor<Vec<u8>>,
}

impl ByteChannel {
    fn new(data: Vec<u8>) -> Self {
        Self {
            data: Cursor::new(data),
        }
    }

    pub fn size(&self) -> u64 {
        self.data.get_ref().len() as u64
    }

    pub fn position(&self) -> u64 {
        self.data.position()
    }

    pub fn set_position(&mut self, position: u64) {
        self.data.set_position(position);
    }

    pub fn truncate(&mut self, _size: u64) -> Result<(), FsError> {
        Err(FsError::ReadOnly)
    }
}

impl Read for ByteChannel {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.data.read(buf)
    }
}

impl Seek for ByteChannel {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.data.seek(pos)
    }
}

impl Write for ByteChannel {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(FsError::ReadOnly.into())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
