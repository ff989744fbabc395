use std::{fmt, fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::{ConfigError, Result};

/// Number of records requested per page when nothing else is configured.
pub const DEFAULT_PER_PAGE: usize = 50;

pub const DEFAULT_USER_AGENT: &str = "pkgscan";

/// Connection settings for the remote source hosting service.
///
/// The credential is injected by the caller and stays immutable for the
/// lifetime of the value; nothing here reads ambient process state.
#[derive(Clone, Deserialize, Serialize)]
pub struct RemoteConfig {
    /// Host name of the remote service. Repositories hosted elsewhere are refused.
    pub host: String,

    /// Base URL of the REST API.
    /// Default: https://{host}/api/v4
    pub api_url: Option<String>,

    /// Base URL used to build raw file URLs.
    /// Default: https://{host}
    pub web_url: Option<String>,

    /// Private token sent with every request. Never written back out.
    #[serde(skip_serializing)]
    pub token: Option<String>,

    /// Records requested per page.
    /// Default: 50
    pub per_page: Option<usize>,

    /// Number of manifests fetched concurrently.
    /// Default: 1
    pub jobs: Option<usize>,

    /// Default: "pkgscan"
    pub user_agent: Option<String>,

    /// Global timeout applied to each request, in seconds.
    pub timeout_secs: Option<u64>,
}

impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("host", &self.host)
            .field("api_url", &self.api_url)
            .field("web_url", &self.web_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("per_page", &self.per_page)
            .field("jobs", &self.jobs)
            .field("user_agent", &self.user_agent)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl RemoteConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            api_url: None,
            web_url: None,
            token: None,
            per_page: None,
            jobs: None,
            user_agent: None,
            timeout_secs: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = Some(jobs);
        self
    }

    pub fn with_per_page(mut self, per_page: usize) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Parses a configuration from TOML text and validates it.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Renders the configuration as TOML, leaving out the token.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Loads and validates a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading remote configuration from {}", path.display());

        let content = fs::read_to_string(path).map_err(|err| {
            ConfigError::IoError {
                action: format!("reading {}", path.display()),
                source: err,
            }
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if self.per_page == Some(0) {
            return Err(ConfigError::InvalidPageSize);
        }
        if self.jobs == Some(0) {
            return Err(ConfigError::InvalidJobs);
        }
        for (field, value) in [("api_url", &self.api_url), ("web_url", &self.web_url)] {
            if let Some(value) = value {
                Url::parse(value).map_err(|_| {
                    ConfigError::InvalidUrl {
                        field,
                        value: value.clone(),
                    }
                })?;
            }
        }
        Ok(())
    }

    pub fn api_url(&self) -> String {
        self.api_url
            .as_deref()
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("https://{}/api/v4", self.host))
    }

    pub fn web_url(&self) -> String {
        self.web_url
            .as_deref()
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("https://{}", self.host))
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn per_page(&self) -> usize {
        self.per_page.unwrap_or(DEFAULT_PER_PAGE)
    }

    pub fn jobs(&self) -> usize {
        self.jobs.unwrap_or(1)
    }

    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Whether `server` is the configured host or one of its subdomains.
    pub fn matches_host(&self, server: &str) -> bool {
        let server = server.trim_end_matches('.').to_ascii_lowercase();
        let host = self.host.trim_end_matches('.').to_ascii_lowercase();

        server == host
            || server
                .strip_suffix(&host)
                .is_some_and(|prefix| prefix.ends_with('.'))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = RemoteConfig::new("gitlab.example.com");
        assert_eq!(config.api_url(), "https://gitlab.example.com/api/v4");
        assert_eq!(config.web_url(), "https://gitlab.example.com");
        assert_eq!(config.per_page(), 50);
        assert_eq!(config.jobs(), 1);
        assert_eq!(config.user_agent(), "pkgscan");
        assert!(config.token().is_none());
        assert!(config.timeout().is_none());
    }

    #[test]
    fn test_from_toml_str() {
        let config = RemoteConfig::from_toml_str(
            r#"
            host = "gitlab.example.com"
            api_url = "http://gitlab.example.com/api/v4/"
            token = "secret"
            per_page = 20
            jobs = 4
            timeout_secs = 30
            "#,
        )
        .unwrap();

        assert_eq!(config.api_url(), "http://gitlab.example.com/api/v4");
        assert_eq!(config.token(), Some("secret"));
        assert_eq!(config.per_page(), 20);
        assert_eq!(config.jobs(), 4);
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_validation_errors() {
        assert!(matches!(
            RemoteConfig::from_toml_str("host = \"\""),
            Err(ConfigError::EmptyHost)
        ));
        assert!(matches!(
            RemoteConfig::from_toml_str("host = \"a.b\"\nper_page = 0"),
            Err(ConfigError::InvalidPageSize)
        ));
        assert!(matches!(
            RemoteConfig::from_toml_str("host = \"a.b\"\njobs = 0"),
            Err(ConfigError::InvalidJobs)
        ));
        assert!(matches!(
            RemoteConfig::from_toml_str("host = \"a.b\"\napi_url = \"nope\""),
            Err(ConfigError::InvalidUrl { field: "api_url", .. })
        ));
        assert!(matches!(
            RemoteConfig::from_toml_str("host = 1"),
            Err(ConfigError::TomlDeError(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "host = \"gitlab.example.com\"").unwrap();

        let config = RemoteConfig::load(file.path()).unwrap();
        assert_eq!(config.host, "gitlab.example.com");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = RemoteConfig::load(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError { .. }));
    }

    #[test]
    fn test_matches_host() {
        let config = RemoteConfig::new("gitlab.example.com");
        assert!(config.matches_host("gitlab.example.com"));
        assert!(config.matches_host("GitLab.Example.com"));
        assert!(config.matches_host("prod.gitlab.example.com"));
        assert!(!config.matches_host("other-host.example.com"));
        assert!(!config.matches_host("evilgitlab.example.com"));
    }

    #[test]
    fn test_to_toml_string_skips_token() {
        let config = RemoteConfig::new("gitlab.example.com")
            .with_token("hunter2")
            .with_jobs(4);

        let rendered = config.to_toml_string().unwrap();
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("token"));

        let reloaded = RemoteConfig::from_toml_str(&rendered).unwrap();
        assert_eq!(reloaded.host, "gitlab.example.com");
        assert_eq!(reloaded.jobs(), 4);
        assert!(reloaded.token().is_none());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = RemoteConfig::new("gitlab.example.com").with_token("hunter2");
        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }
}
