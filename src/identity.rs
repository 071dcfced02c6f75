//! Repository coordinates
//!
//! A `RepositoryIdentity` pins a node of the remote tree to
//! `(repository, resolved revision, subpath)` and renders it as
//! `github:OWNER/NAME@REVISION[#SUBPATH]`.

use crate::error::FsError;
use crate::path::{FileSystemId, RepoPath};
use crate::remote::ContentApi;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;
use tracing::debug;

/// Scheme prefix of canonical identity strings.
pub const SCHEME: &str = "github";

/// Everything except RFC 3986 unreserved characters gets encoded.
const COORDINATE_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// A remote repository, `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Repository {
    owner: String,
    name: String,
}

impl Repository {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse `owner/name`.
    pub fn parse(full_name: &str) -> Result<Self, FsError> {
        match full_name.split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self::new(owner, name))
            }
            _ => Err(FsError::InvalidArgument(format!(
                "repository must be 'owner/name', got '{}'",
                full_name
            ))),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Canonical coordinate of a node: repository, concrete ref, subpath.
#[derive(Clone)]
pub struct RepositoryIdentity {
    repository: Repository,
    revision: String,
    subpath: String,
    canonical: String,
    fs: FileSystemId,
    path: OnceLock<RepoPath>,
}

impl RepositoryIdentity {
    /// Resolve `revision` against the repository's refs and fix the subpath.
    ///
    /// With no revision the first ref listed becomes the revision; an explicit
    /// revision must match a listed ref exactly.
    pub fn resolve<A: ContentApi + ?Sized>(
        api: &A,
        repository: &Repository,
        revision: Option<&str>,
        subpath: Option<&str>,
        fs: FileSystemId,
    ) -> Result<Self, FsError> {
        let subpath = normalize_subpath(subpath)?;
        let refs = api.list_refs(repository)?;
        let revision = select_revision(&refs, revision, repository)?;
        debug!(repository = %repository, revision = %revision, subpath = %subpath, "Resolved coordinate");
        Ok(Self::from_parts(repository.clone(), revision, subpath, fs))
    }

    /// Build from an already resolved revision and normalized subpath.
    pub(crate) fn from_parts(
        repository: Repository,
        revision: String,
        subpath: String,
        fs: FileSystemId,
    ) -> Self {
        let canonical = canonical_string(&repository, &revision, &subpath);
        Self {
            repository,
            revision,
            subpath,
            canonical,
            fs,
            path: OnceLock::new(),
        }
    }

    /// Same repository and revision, another subpath.
    pub fn with_subpath(&self, subpath: &str) -> Self {
        let subpath = subpath.strip_prefix('/').unwrap_or(subpath);
        let subpath = subpath.strip_suffix('/').unwrap_or(subpath);
        Self::from_parts(
            self.repository.clone(),
            self.revision.clone(),
            subpath.to_string(),
            self.fs,
        )
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    pub fn revision(&self) -> &str {
        &self.revision
    }

    /// Subpath without leading or trailing separator; empty for the root.
    pub fn subpath(&self) -> &str {
        &self.subpath
    }

    /// Path of the subpath on the owning filesystem, built on first use.
    pub fn canonical_path(&self) -> &RepoPath {
        self.path
            .get_or_init(|| RepoPath::from_trusted(self.fs, &self.subpath))
    }

    pub fn canonicalize(&self) -> &str {
        &self.canonical
    }
}

impl PartialEq for RepositoryIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for RepositoryIdentity {}

impl Hash for RepositoryIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl Ord for RepositoryIdentity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical.cmp(&other.canonical)
    }
}

impl PartialOrd for RepositoryIdentity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for RepositoryIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl fmt::Debug for RepositoryIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RepositoryIdentity")
            .field(&self.canonical)
            .finish()
    }
}

/// Strip one leading and one trailing separator; blank means the root.
fn normalize_subpath(subpath: Option<&str>) -> Result<String, FsError> {
    let trimmed = subpath.map(str::trim).unwrap_or("");
    if trimmed.contains('\0') {
        return Err(FsError::invalid_path(trimmed, "nul character not allowed"));
    }
    let trimmed = trimmed.strip_prefix('/').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    Ok(trimmed.to_string())
}

fn select_revision(
    refs: &[String],
    requested: Option<&str>,
    repository: &Repository,
) -> Result<String, FsError> {
    match requested.filter(|r| !r.is_empty()) {
        Some(requested) => refs
            .iter()
            .find(|r| r.as_str() == requested)
            .cloned()
            .ok_or_else(|| {
                FsError::InvalidArgument(format!(
                    "Ref '{}' not found in {}",
                    requested,
                    repository.full_name()
                ))
            }),
        // TODO: prefer the repository's default branch once the content API exposes it.
        None => refs.first().cloned().ok_or_else(|| {
            FsError::InvalidArgument(format!("{} has no refs", repository.full_name()))
        }),
    }
}

fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, COORDINATE_SEGMENT).to_string()
}

/// GitHub owner and repository names are case-insensitive, so they are folded
/// to lowercase. The revision and subpath keep their case.
fn canonical_string(repository: &Repository, revision: &str, subpath: &str) -> String {
    let mut out = format!(
        "{}:{}/{}@{}",
        SCHEME,
        encode_segment(&repository.owner().to_lowercase()),
        encode_segment(&repository.name().to_lowercase()),
        encode_segment(revision)
    );
    if !subpath.is_empty() {
        let encoded: Vec<String> = subpath.split('/').map(encode_segment).collect();
        out.push('#');
        out.push_str(&encoded.join("/"));
    }
    out
}
