use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("TOML serialization error: {0}")]
    #[diagnostic(
        code(pkgscan_config::toml_serialize),
        help("Check your configuration structure for invalid values")
    )]
    TomlSerError(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    #[diagnostic(
        code(pkgscan_config::toml_deserialize),
        help("Check your configuration syntax and structure")
    )]
    TomlDeError(#[from] toml::de::Error),

    #[error("Error while {action}")]
    #[diagnostic(code(pkgscan_config::io))]
    IoError {
        action: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Remote host must not be empty")]
    #[diagnostic(
        code(pkgscan_config::empty_host),
        help("Set `host` to the name of the remote service, e.g. gitlab.example.com")
    )]
    EmptyHost,

    #[error("Invalid URL for `{field}`: {value}")]
    #[diagnostic(code(pkgscan_config::invalid_url))]
    InvalidUrl { field: &'static str, value: String },

    #[error("Page size must be greater than zero")]
    #[diagnostic(code(pkgscan_config::invalid_page_size))]
    InvalidPageSize,

    #[error("Job count must be greater than zero")]
    #[diagnostic(code(pkgscan_config::invalid_jobs))]
    InvalidJobs,
}

pub type Result<T> = std::result::Result<T, ConfigError>;
