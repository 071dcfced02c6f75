//! Filesystem locators
//!
//! `github:OWNER/NAME[?revision=REV][!/PATH]`, e.g.
//! `github:gnodet/githubfs?revision=refs%2Fheads%2Fmaster!/README.md`.

use crate::error::FsError;
use crate::identity::{Repository, SCHEME};
use percent_encoding::percent_decode_str;
use std::fmt;
use tracing::debug;

/// Parsed locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsLocator {
    pub repository: Repository,
    pub revision: Option<String>,
    /// Path inside the repository; `/` when the locator names none.
    pub path: String,
}

impl FsLocator {
    pub fn parse(locator: &str) -> Result<Self, FsError> {
        let rest = locator
            .strip_prefix(SCHEME)
            .and_then(|r| r.strip_prefix(':'))
            .ok_or_else(|| {
                FsError::InvalidArgument(format!(
                    "locator must start with '{}:', got '{}'",
                    SCHEME, locator
                ))
            })?;

        let (target, path) = match rest.split_once('!') {
            Some((target, path)) if !path.is_empty() => (target, path.to_string()),
            Some((target, _)) => (target, "/".to_string()),
            None => (rest, "/".to_string()),
        };
        if target.contains('@') {
            return Err(FsError::InvalidArgument(
                "credentials in locators are not supported".to_string(),
            ));
        }

        let (repository, query) = match target.split_once('?') {
            Some((repository, query)) => (repository, Some(query)),
            None => (target, None),
        };

        let mut revision = None;
        for pair in query.into_iter().flat_map(|q| q.split('&')) {
            if pair.is_empty() {
                continue;
            }
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = decode(key)?;
            match key.as_str() {
                "revision" => revision = Some(decode(value)?),
                "login" | "password" | "oauth" => {
                    return Err(FsError::InvalidArgument(
                        "credentials in locators are not supported".to_string(),
                    ))
                }
                other => debug!(parameter = %other, "Ignoring unknown locator parameter"),
            }
        }

        Ok(Self {
            repository: Repository::parse(repository)?,
            revision: revision.filter(|r| !r.is_empty()),
            path,
        })
    }
}

fn decode(raw: &str) -> Result<String, FsError> {
    percent_decode_str(&raw.replace('+', " "))
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|e| FsError::InvalidArgument(format!("malformed locator component '{}': {}", raw, e)))
}

impl fmt::Display for FsLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", SCHEME, self.repository)?;
        if let Some(revision) = &self.revision {
            let encoded = percent_encoding::utf8_percent_encode(
                revision,
                percent_encoding::NON_ALPHANUMERIC,
            );
            write!(f, "?revision={}", encoded)?;
        }
        write!(f, "!{}", self.path)
    }
}

impl std::str::FromStr for FsLocator {
    type Err = FsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
