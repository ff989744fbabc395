//! Error types for pkgscan-core.

use miette::Diagnostic;
use pkgscan_config::ConfigError;
use pkgscan_index::IndexError;
use pkgscan_remote::RemoteError;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ScanError {
    #[error("Unsupported host '{server}', expected '{expected}'")]
    #[diagnostic(
        code(pkgscan::unsupported_host),
        help("Only repositories on the configured host can be scanned")
    )]
    UnsupportedHost { server: String, expected: String },

    #[error("Repository has no version to scan")]
    #[diagnostic(
        code(pkgscan::missing_version),
        help("Set the branch or tag the repository is tracked at")
    )]
    MissingVersion,

    #[error("Project '{0}' not found")]
    #[diagnostic(
        code(pkgscan::project_not_found),
        help("Check the repository path and that the token can access it")
    )]
    ProjectNotFound(String),

    #[error("Cannot resolve '{version}' in project {project}")]
    #[diagnostic(
        code(pkgscan::resolution),
        help("Check that the branch or tag exists")
    )]
    Resolution { project: String, version: String },

    #[error("Failed to fetch from remote source: {0}")]
    #[diagnostic(code(pkgscan::fetch))]
    Fetch(#[from] RemoteError),

    #[error("Package '{name}' is declared in both '{first}' and '{second}'")]
    #[diagnostic(
        code(pkgscan::duplicate_name),
        help("Each package directory must declare a distinct package name")
    )]
    DuplicateName {
        name: String,
        first: String,
        second: String,
    },

    #[error("Invalid manifest: {0}")]
    #[diagnostic(code(pkgscan::manifest_parse))]
    ManifestParse(String),

    #[error("Failed to start fetch workers: {0}")]
    #[diagnostic(code(pkgscan::worker_pool))]
    WorkerPool(String),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, ScanError>;
