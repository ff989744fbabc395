use pkgscan_config::RemoteConfig;
use tracing::{debug, trace};
use ureq::{http::header::LINK, Agent};

use crate::error::{RemoteError, Result};

/// Header carrying the private access token.
pub const TOKEN_HEADER: &str = "PRIVATE-TOKEN";

/// A fully received response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// Raw value of the `Link` response header.
    pub link: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Blocking GET transport.
///
/// Non-2xx answers are returned as responses; only failures to complete the
/// exchange are errors.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> Result<HttpResponse>;
}

/// [`Transport`] backed by a `ureq` agent that authenticates every request.
pub struct UreqTransport {
    agent: Agent,
    token: Option<String>,
}

impl UreqTransport {
    /// Builds an agent from the user agent, timeout and token in `config`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pkgscan_config::RemoteConfig;
    /// use pkgscan_remote::UreqTransport;
    ///
    /// let config = RemoteConfig::new("gitlab.example.com").with_token("secret");
    /// let _transport = UreqTransport::new(&config);
    /// ```
    pub fn new(config: &RemoteConfig) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(config.timeout())
            .user_agent(config.user_agent())
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            token: config.token().map(String::from),
        }
    }
}

impl Transport for UreqTransport {
    fn get(&self, url: &str) -> Result<HttpResponse> {
        trace!("GET {url}");

        let mut req = self.agent.get(url);
        if let Some(token) = &self.token {
            req = req.header(TOKEN_HEADER, token);
        }

        let mut resp = req.call().map_err(|err| {
            debug!("Request to {url} failed: {err}");
            RemoteError::network(url, err)
        })?;

        let status = resp.status().as_u16();
        let link = resp
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .map(String::from);
        let body = resp.body_mut().read_to_vec().map_err(|err| {
            debug!("Reading response body from {url} failed: {err}");
            RemoteError::network(url, err)
        })?;

        Ok(HttpResponse { status, link, body })
    }
}
