use url::Url;

use crate::error::{IndexError, Result};

/// What the manifest provider needs to know about a repository.
pub trait RepositoryReference {
    /// Branch or tag the repository is tracked at.
    fn version(&self) -> Option<&str>;

    /// Splits the repository URL into `(server, path)`.
    fn url_parts(&self) -> Result<(String, String)>;

    /// Ref holding the released manifest of `package_name`.
    fn release_tag(&self, package_name: &str) -> String;
}

/// Location of a repository on a source hosting service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRepository {
    pub url: String,
    pub version: Option<String>,
    /// Tag template; `{package}` and `{version}` are substituted.
    pub release_tag: Option<String>,
}

impl SourceRepository {
    pub fn new(url: impl Into<String>, version: Option<String>) -> Self {
        Self {
            url: url.into(),
            version,
            release_tag: None,
        }
    }
}

impl RepositoryReference for SourceRepository {
    fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    fn url_parts(&self) -> Result<(String, String)> {
        split_url(&self.url).ok_or_else(|| IndexError::InvalidUrl(self.url.clone()))
    }

    fn release_tag(&self, package_name: &str) -> String {
        let version = self.version.as_deref().unwrap_or_default();
        match &self.release_tag {
            Some(template) => {
                template
                    .replace("{package}", package_name)
                    .replace("{version}", version)
            }
            None => version.to_string(),
        }
    }
}

fn split_url(url: &str) -> Option<(String, String)> {
    let (server, path) = match Url::parse(url) {
        Ok(parsed) if parsed.has_host() => {
            (parsed.host_str()?.to_string(), parsed.path().to_string())
        }
        _ => {
            // scp-like syntax: user@server:namespace/name
            let (authority, path) = url.split_once(':')?;
            let server = authority.rsplit('@').next()?;
            (server.to_string(), path.to_string())
        }
    };

    let path = path.trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    if server.is_empty() || path.is_empty() {
        return None;
    }
    Some((server, path.to_string()))
}
