//! Repository paths
//!
//! `RepoPath` is an immutable, byte-oriented, slash-separated path bound to one
//! filesystem handle. Segment offsets and the normalized form are derived
//! lazily and published exactly once per instance.

use crate::error::FsError;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::OnceLock;

const SEPARATOR: u8 = b'/';

/// Identifies the filesystem handle a path belongs to.
///
/// Paths only compare equal, resolve against, or relativize with paths that
/// carry the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileSystemId(u64);

impl FileSystemId {
    /// Allocate a fresh, process-unique id.
    pub fn new() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        FileSystemId(NEXT.fetch_add(1, AtomicOrdering::Relaxed))
    }
}

impl Default for FileSystemId {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable hierarchical path over raw bytes.
#[derive(Clone)]
pub struct RepoPath {
    fs: FileSystemId,
    bytes: Box<[u8]>,
    offsets: OnceLock<Box<[usize]>>,
    /// `None` once computed means the raw bytes are already normalized.
    normalized: OnceLock<Option<Box<[u8]>>>,
}

impl RepoPath {
    /// Parse a path string.
    pub fn new(fs: FileSystemId, path: &str) -> Result<Self, FsError> {
        Self::from_bytes(fs, path.as_bytes())
    }

    /// Build a path from raw bytes.
    ///
    /// Rejects embedded NUL. Backslashes are read as separators, runs of
    /// separators collapse to one, and a trailing separator is dropped unless
    /// the path is the root.
    pub fn from_bytes(fs: FileSystemId, path: &[u8]) -> Result<Self, FsError> {
        if path.contains(&0) {
            return Err(FsError::invalid_path(
                String::from_utf8_lossy(path),
                "nul character not allowed",
            ));
        }
        Ok(Self::from_clean(fs, clean_separators(path)))
    }

    /// Build a path from text already known to be free of NUL.
    pub(crate) fn from_trusted(fs: FileSystemId, path: &str) -> Self {
        Self::from_clean(fs, clean_separators(path.as_bytes()))
    }

    /// The root path `/`.
    pub fn root_of(fs: FileSystemId) -> Self {
        Self::from_clean(fs, vec![SEPARATOR])
    }

    /// The empty path.
    pub fn empty(fs: FileSystemId) -> Self {
        Self::from_clean(fs, Vec::new())
    }

    fn from_clean(fs: FileSystemId, bytes: Vec<u8>) -> Self {
        Self {
            fs,
            bytes: bytes.into_boxed_slice(),
            offsets: OnceLock::new(),
            normalized: OnceLock::new(),
        }
    }

    fn sibling(&self, bytes: &[u8]) -> Self {
        Self::from_clean(self.fs, bytes.to_vec())
    }

    pub fn file_system(&self) -> FileSystemId {
        self.fs
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_str_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn is_absolute(&self) -> bool {
        self.bytes.first() == Some(&SEPARATOR)
    }

    /// `/` for absolute paths, `None` for relative ones.
    pub fn root(&self) -> Option<RepoPath> {
        self.is_absolute().then(|| Self::root_of(self.fs))
    }

    /// Start index of every non-empty segment.
    fn offsets(&self) -> &[usize] {
        self.offsets.get_or_init(|| segment_offsets(&self.bytes))
    }

    /// Byte range `[start, end)` of segment `index`.
    fn segment_range(&self, index: usize) -> (usize, usize) {
        let offsets = self.offsets();
        let start = offsets[index];
        let end = if index + 1 == offsets.len() {
            self.bytes.len()
        } else {
            offsets[index + 1] - 1
        };
        (start, end)
    }

    fn segment(&self, index: usize) -> &[u8] {
        let (start, end) = self.segment_range(index);
        &self.bytes[start..end]
    }

    pub fn name_count(&self) -> usize {
        self.offsets().len()
    }

    /// Last segment, or `None` for the empty path and the root.
    pub fn file_name(&self) -> Option<RepoPath> {
        let count = self.name_count();
        if count == 0 {
            return None;
        }
        if count == 1 && !self.is_absolute() {
            return Some(self.clone());
        }
        Some(self.sibling(self.segment(count - 1)))
    }

    /// Everything before the last segment.
    ///
    /// A single-segment absolute path has the root as parent; a single-segment
    /// relative path has none.
    pub fn parent(&self) -> Option<RepoPath> {
        let offsets = self.offsets();
        let last = *offsets.last()?;
        if last <= 1 {
            return self.root();
        }
        Some(self.sibling(&self.bytes[..last - 1]))
    }

    pub fn name(&self, index: usize) -> Result<RepoPath, FsError> {
        if index >= self.name_count() {
            return Err(FsError::InvalidArgument(format!(
                "name index {} out of range for '{}'",
                index, self
            )));
        }
        Ok(self.sibling(self.segment(index)))
    }

    /// Relative path made of segments `[begin, end)`.
    pub fn subpath(&self, begin: usize, end: usize) -> Result<RepoPath, FsError> {
        let count = self.name_count();
        if begin >= count || end > count || begin >= end {
            return Err(FsError::InvalidArgument(format!(
                "subpath [{}, {}) out of range for '{}'",
                begin, end, self
            )));
        }
        let (start, _) = self.segment_range(begin);
        let (_, stop) = self.segment_range(end - 1);
        Ok(self.sibling(&self.bytes[start..stop]))
    }

    /// Iterate segments as single-segment paths. Each call starts over.
    pub fn iter(&self) -> Names<'_> {
        Names {
            path: self,
            index: 0,
        }
    }

    /// Raw byte prefix test that only matches on a segment boundary.
    pub fn starts_with(&self, other: &RepoPath) -> bool {
        if self.fs != other.fs || self.is_absolute() != other.is_absolute() {
            return false;
        }
        let (p1, p2) = (&self.bytes, &other.bytes);
        if p1.len() < p2.len() {
            return false;
        }
        if p2.is_empty() {
            return p1.is_empty();
        }
        let len = p2.len();
        if p1[..len] != p2[..] {
            return false;
        }
        p1.len() == len || p2[len - 1] == SEPARATOR || p1[len] == SEPARATOR
    }

    /// Raw byte suffix test that only matches on a segment boundary.
    pub fn ends_with(&self, other: &RepoPath) -> bool {
        if self.fs != other.fs {
            return false;
        }
        let (p1, p2) = (&self.bytes, &other.bytes);
        let mut i1 = p1.len() as isize - 1;
        if i1 > 0 && p1[i1 as usize] == SEPARATOR {
            i1 -= 1;
        }
        let mut i2 = p2.len() as isize - 1;
        if i2 > 0 && p2[i2 as usize] == SEPARATOR {
            i2 -= 1;
        }
        if i2 == -1 {
            return i1 == -1;
        }
        if (other.is_absolute() && (!self.is_absolute() || i2 != i1)) || i1 < i2 {
            return false;
        }
        while i2 >= 0 {
            if p2[i2 as usize] != p1[i1 as usize] {
                return false;
            }
            i1 -= 1;
            i2 -= 1;
        }
        p2[0] == SEPARATOR || i1 == -1 || p1[i1 as usize] == SEPARATOR
    }

    /// Drop `.` segments and fold `name/..` pairs.
    ///
    /// Leading `..` of a relative path are kept; `..` above the root of an
    /// absolute path are dropped.
    pub fn normalize(&self) -> RepoPath {
        match self.normalized_bytes() {
            Some(bytes) => self.sibling(bytes),
            None => self.clone(),
        }
    }

    fn normalized_bytes(&self) -> Option<&[u8]> {
        self.normalized
            .get_or_init(|| {
                if !self.bytes.contains(&b'.') {
                    return None;
                }
                let resolved = fold_dot_segments(&self.bytes, self.offsets());
                (resolved[..] != self.bytes[..]).then(|| resolved.into_boxed_slice())
            })
            .as_deref()
    }

    /// Append `other`, unless it is absolute, in which case it wins.
    pub fn resolve(&self, other: &RepoPath) -> Result<RepoPath, FsError> {
        self.check_same_fs(other)?;
        if other.is_absolute() || self.is_empty() {
            return Ok(other.clone());
        }
        if other.is_empty() {
            return Ok(self.clone());
        }
        let mut joined = Vec::with_capacity(self.bytes.len() + 1 + other.bytes.len());
        joined.extend_from_slice(&self.bytes);
        if joined.last() != Some(&SEPARATOR) {
            joined.push(SEPARATOR);
        }
        joined.extend_from_slice(&other.bytes);
        Ok(self.sibling(&joined))
    }

    pub fn resolve_str(&self, other: &str) -> Result<RepoPath, FsError> {
        self.resolve(&RepoPath::new(self.fs, other)?)
    }

    /// `parent().resolve(other)`, or `other` when there is no parent.
    pub fn resolve_sibling(&self, other: &RepoPath) -> Result<RepoPath, FsError> {
        self.check_same_fs(other)?;
        match self.parent() {
            Some(parent) => parent.resolve(other),
            None => Ok(other.clone()),
        }
    }

    /// Relative path that leads from `self` to `other`.
    pub fn relativize(&self, other: &RepoPath) -> Result<RepoPath, FsError> {
        self.check_same_fs(other)?;
        if self == other {
            return Ok(Self::empty(self.fs));
        }
        if self.is_absolute() != other.is_absolute() {
            return Err(FsError::InvalidArgument(format!(
                "cannot relativize '{}' against '{}': one is absolute, the other relative",
                other, self
            )));
        }
        let own = self.name_count();
        let theirs = other.name_count();
        let common = (0..own.min(theirs))
            .take_while(|&i| self.segment(i) == other.segment(i))
            .count();

        let mut result = Vec::new();
        for _ in common..own {
            if !result.is_empty() {
                result.push(SEPARATOR);
            }
            result.extend_from_slice(b"..");
        }
        if common < theirs {
            if !result.is_empty() {
                result.push(SEPARATOR);
            }
            let start = other.offsets()[common];
            result.extend_from_slice(&other.bytes[start..]);
        }
        Ok(self.sibling(&result))
    }

    pub fn to_absolute_path(&self) -> RepoPath {
        if self.is_absolute() {
            return self.clone();
        }
        let mut bytes = Vec::with_capacity(self.bytes.len() + 1);
        bytes.push(SEPARATOR);
        bytes.extend_from_slice(&self.bytes);
        self.sibling(&bytes)
    }

    /// Segments joined by `/`, without a leading or trailing separator.
    pub fn to_relative_string(&self) -> String {
        self.iter()
            .map(|name| name.to_str_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }

    fn check_same_fs(&self, other: &RepoPath) -> Result<(), FsError> {
        if self.fs != other.fs {
            return Err(FsError::invalid_path(
                other.to_str_lossy(),
                "path belongs to a different filesystem",
            ));
        }
        Ok(())
    }
}

/// Iterator over the segments of a [`RepoPath`].
pub struct Names<'a> {
    path: &'a RepoPath,
    index: usize,
}

impl Iterator for Names<'_> {
    type Item = RepoPath;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.path.name_count() {
            return None;
        }
        let name = self.path.sibling(self.path.segment(self.index));
        self.index += 1;
        Some(name)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.path.name_count().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl<'a> IntoIterator for &'a RepoPath {
    type Item = RepoPath;
    type IntoIter = Names<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl PartialEq for RepoPath {
    fn eq(&self, other: &Self) -> bool {
        self.fs == other.fs && self.bytes == other.bytes
    }
}

impl Eq for RepoPath {}

impl Hash for RepoPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fs.hash(state);
        self.bytes.hash(state);
    }
}

impl Ord for RepoPath {
    /// Unsigned byte order on the raw bytes; the filesystem id only breaks ties.
    fn cmp(&self, other: &Self) -> Ordering {
        self.bytes
            .cmp(&other.bytes)
            .then_with(|| self.fs.cmp(&other.fs))
    }
}

impl PartialOrd for RepoPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for RepoPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_str_lossy())
    }
}

impl fmt::Debug for RepoPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RepoPath({:?})", self.to_str_lossy())
    }
}

fn clean_separators(path: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(path.len());
    for &b in path {
        let b = if b == b'\\' { SEPARATOR } else { b };
        if b == SEPARATOR && out.last() == Some(&SEPARATOR) {
            continue;
        }
        out.push(b);
    }
    if out.len() > 1 && out.last() == Some(&SEPARATOR) {
        out.pop();
    }
    out
}

fn segment_offsets(path: &[u8]) -> Box<[usize]> {
    let mut offsets = Vec::new();
    let mut index = 0;
    while index < path.len() {
        if path[index] == SEPARATOR {
            index += 1;
            continue;
        }
        offsets.push(index);
        while index < path.len() && path[index] != SEPARATOR {
            index += 1;
        }
    }
    offsets.into_boxed_slice()
}

fn fold_dot_segments(path: &[u8], offsets: &[usize]) -> Vec<u8> {
    let absolute = path.first() == Some(&SEPARATOR);
    let mut out: Vec<u8> = Vec::with_capacity(path.len());
    // Start of each emitted name, so `..` can retreat to it.
    let mut emitted: Vec<usize> = Vec::with_capacity(offsets.len());

    for (i, &start) in offsets.iter().enumerate() {
        let end = offsets.get(i + 1).map_or(path.len(), |next| next - 1);
        let name = &path[start..end];

        if name == b"." {
            if out.is_empty() && absolute {
                out.push(SEPARATOR);
            }
            continue;
        }
        if name == b".." {
            if let Some(mark) = emitted.pop() {
                out.truncate(mark);
            } else if absolute {
                if out.is_empty() {
                    out.push(SEPARATOR);
                }
            } else {
                if out.last().is_some_and(|&b| b != SEPARATOR) {
                    out.push(SEPARATOR);
                }
                out.extend_from_slice(name);
            }
            continue;
        }
        if (out.is_empty() && absolute) || out.last().is_some_and(|&b| b != SEPARATOR) {
            out.push(SEPARATOR);
        }
        emitted.push(out.len());
        out.extend_from_slice(name);
    }

    if out.len() > 1 && out.last() == Some(&SEPARATOR) {
        out.pop();
    }
    out
}
