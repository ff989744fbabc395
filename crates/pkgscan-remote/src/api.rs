use std::fmt;

use percent_encoding::utf8_percent_encode;
use pkgscan_config::RemoteConfig;
use tracing::debug;

use crate::{
    error::{RemoteError, Result},
    http_client::{HttpResponse, Transport},
    paged::{query_url, PagedQuery, QUERY_VALUE},
};

/// Identifier of a project in API paths: either the numeric id or the
/// URL-encoded `namespace/name` path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn numeric(id: u64) -> Self {
        Self(id.to_string())
    }

    /// Encodes a `namespace/name` path so it can stand in for the numeric id.
    pub fn from_path(path: &str) -> Self {
        Self(utf8_percent_encode(path.trim_matches('/'), QUERY_VALUE).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Endpoint helpers for a GitLab-style REST API.
pub struct RemoteApi<T: Transport> {
    config: RemoteConfig,
    transport: T,
}

impl<T: Transport> RemoteApi<T> {
    pub fn new(config: RemoteConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Performs a GET and rejects non-2xx answers.
    pub fn get(&self, url: &str) -> Result<HttpResponse> {
        let resp = self.transport.get(url)?;
        if !resp.is_success() {
            debug!("Request to {url} failed with HTTP {}", resp.status);
            return Err(RemoteError::HttpError {
                status: resp.status,
                url: url.to_string(),
            });
        }
        Ok(resp)
    }

    /// Fetches a body and decodes it as UTF-8 text.
    pub fn fetch_text(&self, url: &str) -> Result<String> {
        let resp = self.get(url)?;
        String::from_utf8(resp.body).map_err(|err| {
            debug!("Response from {url} is not valid UTF-8: {err}");
            RemoteError::InvalidResponse {
                url: url.to_string(),
                reason: err.to_string(),
            }
        })
    }

    /// Lists `projects/{project}/{resource}` page by page.
    pub fn paged(
        &self,
        project: &ProjectId,
        resource: &str,
        params: &[(&str, &str)],
    ) -> PagedQuery<'_, T> {
        let endpoint = format!(
            "{}/projects/{}/{}",
            self.config.api_url(),
            project,
            resource.trim_matches('/')
        );
        PagedQuery::new(self, query_url(&endpoint, params, self.config.per_page()))
    }

    /// Lists every project visible to the configured credential.
    pub fn projects(&self) -> PagedQuery<'_, T> {
        let endpoint = format!("{}/projects", self.config.api_url());
        PagedQuery::new(
            self,
            query_url(
                &endpoint,
                &[("order_by", "id"), ("sort", "asc")],
                self.config.per_page(),
            ),
        )
    }

    /// Most recent commits reachable from `ref_name`.
    pub fn commits(&self, project: &ProjectId, ref_name: &str) -> PagedQuery<'_, T> {
        self.paged(
            project,
            "repository/commits",
            &[("per_page", "1"), ("ref_name", ref_name)],
        )
    }

    /// Every entry of the repository tree at `sha`, recursively.
    pub fn tree(&self, project: &ProjectId, sha: &str) -> PagedQuery<'_, T> {
        self.paged(
            project,
            "repository/tree",
            &[("recursive", "true"), ("ref", sha)],
        )
    }

    /// API endpoint returning the raw content of `file_path` at `git_ref`.
    pub fn raw_file_url(&self, project: &ProjectId, file_path: &str, git_ref: &str) -> String {
        format!(
            "{}/projects/{}/repository/files/{}/raw?ref={}",
            self.config.api_url(),
            project,
            utf8_percent_encode(file_path, QUERY_VALUE),
            utf8_percent_encode(git_ref, QUERY_VALUE)
        )
    }

    /// Web URL returning the raw content of `file_path` at `sha` in the
    /// project at `path`.
    pub fn web_raw_url(&self, path: &str, sha: &str, file_path: &str) -> String {
        format!(
            "{}/{}/-/raw/{}/{}",
            self.config.web_url(),
            encode_segments(path.trim_matches('/')),
            utf8_percent_encode(sha, QUERY_VALUE),
            encode_segments(file_path)
        )
    }
}

/// Percent-encodes each `/`-separated segment, keeping the separators.
fn encode_segments(path: &str) -> String {
    path.split('/')
        .map(|segment| utf8_percent_encode(segment, QUERY_VALUE).to_string())
        .collect::<Vec<_>>()
        .join("/")
}
