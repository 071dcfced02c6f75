//! githubfs: a read-only filesystem over a GitHub repository
//!
//! A repository at a fixed revision is exposed through [`GitHubFileSystem`]:
//! paths are [`RepoPath`] values, and resolving one yields a [`ContentEntry`]
//! that is either a file (bytes fetched on demand) or a directory (whole
//! subtree materialized up front). Every entry carries a canonical
//! [`RepositoryIdentity`] of the form `github:OWNER/NAME@REV#SUBPATH`.
//!
//! Remote access goes through the [`ContentApi`] trait; [`GitHubContentApi`]
//! talks to the REST API and [`MemoryContentApi`] serves an in-memory tree.

pub mod cli;
pub mod config;
pub mod content;
pub mod error;
pub mod filesystem;
pub mod identity;
pub mod logging;
pub mod path;
pub mod remote;
pub mod resolver;
pub mod uri;

pub use content::{BasicAttributes, ByteChannel, ContentEntry, DirectoryContent, FileContent};
pub use error::{FsError, NodeKind, RemoteError};
pub use filesystem::GitHubFileSystem;
pub use identity::{Repository, RepositoryIdentity};
pub use path::{FileSystemId, RepoPath};
pub use remote::{ContentApi, GitHubContentApi, MemoryContentApi};
pub use resolver::ContentResolver;
pub use uri::FsLocator;
