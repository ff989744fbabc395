use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum RemoteError {
    #[error("Request to {url} failed: {source}")]
    #[diagnostic(
        code(pkgscan_remote::network),
        help("Check your network connection and the configured host")
    )]
    Network {
        url: String,
        #[source]
        source: Box<ureq::Error>,
    },

    #[error("HTTP {status}: {url}")]
    #[diagnostic(code(pkgscan_remote::http_error))]
    HttpError { status: u16, url: String },

    #[error("Invalid response from {url}: {reason}")]
    #[diagnostic(code(pkgscan_remote::invalid_response))]
    InvalidResponse { url: String, reason: String },
}

impl RemoteError {
    pub fn network(url: impl Into<String>, source: ureq::Error) -> Self {
        Self::Network {
            url: url.into(),
            source: Box::new(source),
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::Network { url, .. } | Self::HttpError { url, .. } => url,
            Self::InvalidResponse { url, .. } => url,
        }
    }

    /// HTTP status of the failed response, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RemoteError>;
