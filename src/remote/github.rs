//! GitHub REST content API
//!
//! Blocking client over `/repos/{owner}/{name}/git/refs` and
//! `/repos/{owner}/{name}/contents/{path}`. The contents endpoint answers a
//! file with a JSON object and a directory with a JSON array; asking for the
//! wrong one surfaces as [`RemoteError::TypeMismatch`].

use super::{ContentApi, ContentStream, RemoteEntry, RemoteFile, RemoteKind};
use crate::config::ApiConfig;
use crate::error::{FsError, NodeKind, RemoteError};
use crate::identity::Repository;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const REFS_PAGE_SIZE: usize = 100;
const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw";

const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

#[derive(Deserialize)]
struct GitRef {
    #[serde(rename = "ref")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct ContentItem {
    path: String,
    #[serde(default)]
    size: u64,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ContentsResponse {
    Listing(Vec<ContentItem>),
    Single(ContentItem),
}

// Map a non-success HTTP status to RemoteError
fn map_status(status: StatusCode, rate_limit_exhausted: bool, what: &str) -> RemoteError {
    match status.as_u16() {
        404 => RemoteError::NotFound(what.to_string()),
        403 if rate_limit_exhausted => {
            RemoteError::RateLimited(format!("Rate limit exhausted while fetching {}", what))
        }
        401 | 403 => RemoteError::Unauthorized(format!("{} returned {}", what, status)),
        429 => RemoteError::RateLimited(format!("{} returned {}", what, status)),
        _ => RemoteError::Transport(format!("Request for {} failed with status {}", what, status)),
    }
}

fn map_http_error(error: reqwest::Error) -> RemoteError {
    if error.is_timeout() {
        RemoteError::Transport(format!("Request timeout: {}", error))
    } else if error.is_connect() {
        RemoteError::Transport(format!("Connection error: {}", error))
    } else if error.is_decode() {
        RemoteError::Malformed(format!("Undecodable response: {}", error))
    } else {
        RemoteError::Transport(format!("HTTP error: {}", error))
    }
}

fn encode_path(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

fn into_file(response: ContentsResponse, path: &str) -> Result<RemoteFile, RemoteError> {
    match response {
        ContentsResponse::Single(item) if item.kind != "dir" => Ok(RemoteFile {
            path: item.path,
            size: item.size,
        }),
        _ => Err(RemoteError::TypeMismatch {
            path: path.to_string(),
            actual: NodeKind::Directory,
        }),
    }
}

fn into_listing(response: ContentsResponse, path: &str) -> Result<Vec<RemoteEntry>, RemoteError> {
    match response {
        ContentsResponse::Listing(items) => Ok(items
            .into_iter()
            .map(|item| RemoteEntry {
                kind: if item.kind == "dir" {
                    RemoteKind::Directory
                } else {
                    RemoteKind::File { size: item.size }
                },
                path: item.path,
            })
            .collect()),
        ContentsResponse::Single(_) => Err(RemoteError::TypeMismatch {
            path: path.to_string(),
            actual: NodeKind::File,
        }),
    }
}

/// Content API client for api.github.com (or a GitHub Enterprise base URL).
pub struct GitHubContentApi {
    client: Client,
    base_url: String,
}

impl GitHubContentApi {
    pub fn new(config: &ApiConfig) -> Result<Self, FsError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_MEDIA_TYPE));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| FsError::Config(format!("Invalid user agent: {}", e)))?,
        );
        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| FsError::Config(format!("Invalid API token: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| FsError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn refs_url(&self, repository: &Repository) -> String {
        format!(
            "{}/repos/{}/{}/git/refs",
            self.base_url,
            encode_path(repository.owner()),
            encode_path(repository.name())
        )
    }

    fn contents_url(&self, repository: &Repository, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.base_url,
            encode_path(repository.owner()),
            encode_path(repository.name()),
            encode_path(path)
        )
    }

    fn send(
        &self,
        request: reqwest::blocking::RequestBuilder,
        what: &str,
    ) -> Result<Response, RemoteError> {
        let response = request.send().map_err(map_http_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let exhausted = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            == Some("0");
        Err(map_status(status, exhausted, what))
    }

    fn fetch_contents(
        &self,
        repository: &Repository,
        revision: &str,
        path: &str,
    ) -> Result<ContentsResponse, RemoteError> {
        let url = self.contents_url(repository, path);
        debug!(url = %url, revision = %revision, "Fetching contents");
        let request = self.client.get(&url).query(&[("ref", revision)]);
        self.send(request, path)?
            .json::<ContentsResponse>()
            .map_err(map_http_error)
    }
}

impl ContentApi for GitHubContentApi {
    fn list_refs(&self, repository: &Repository) -> Result<Vec<String>, RemoteError> {
        let url = self.refs_url(repository);
        let mut refs = Vec::new();
        for page in 1.. {
            debug!(url = %url, page, "Listing refs");
            let request = self.client.get(&url).query(&[
                ("per_page", REFS_PAGE_SIZE.to_string()),
                ("page", page.to_string()),
            ]);
            let batch: Vec<GitRef> = self
                .send(request, &repository.full_name())?
                .json()
                .map_err(map_http_error)?;
            let done = batch.len() < REFS_PAGE_SIZE;
            refs.extend(batch.into_iter().map(|r| r.name));
            if done {
                break;
            }
        }
        Ok(refs)
    }

    fn fetch_file(
        &self,
        repository: &Repository,
        revision: &str,
        path: &str,
    ) -> Result<RemoteFile, RemoteError> {
        into_file(self.fetch_contents(repository, revision, path)?, path)
    }

    fn fetch_directory(
        &self,
        repository: &Repository,
        revision: &str,
        path: &str,
    ) -> Result<Vec<RemoteEntry>, RemoteError> {
        into_listing(self.fetch_contents(repository, revision, path)?, path)
    }

    fn open_file(
        &self,
        repository: &Repository,
        revision: &str,
        path: &str,
    ) -> Result<ContentStream, RemoteError> {
        let request = self
            .client
            .get(self.contents_url(repository, path))
            .header(ACCEPT, RAW_MEDIA_TYPE)
            .query(&[("ref", revision)]);
        Ok(Box::new(self.send(request, path)?))
    }
}
