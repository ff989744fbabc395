//! Error types for the index crate.

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum IndexError {
    #[error("Unexpected document type '{found}', expected '{expected}'")]
    #[diagnostic(code(pkgscan_index::malformed_document::doc_type))]
    UnexpectedType { expected: String, found: String },

    #[error("Unsupported document version {0}")]
    #[diagnostic(
        code(pkgscan_index::malformed_document::version),
        help("Only version 1 documents are supported")
    )]
    UnsupportedVersion(u32),

    #[error("Duplicate package name '{name}' in repository '{repository}'")]
    #[diagnostic(
        code(pkgscan_index::malformed_document::duplicate_package),
        help("Package names must be unique across all repositories")
    )]
    DuplicatePackage { name: String, repository: String },

    #[error(transparent)]
    #[diagnostic(
        code(pkgscan_index::json),
        help("The document may be corrupted or in an invalid format")
    )]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid repository URL: {0}")]
    #[diagnostic(
        code(pkgscan_index::invalid_url),
        help("Use https://host/namespace/name or git@host:namespace/name")
    )]
    InvalidUrl(String),
}

impl IndexError {
    /// Whether the document failed type, version or uniqueness validation.
    pub fn is_malformed_document(&self) -> bool {
        matches!(
            self,
            Self::UnexpectedType { .. } | Self::UnsupportedVersion(_) | Self::DuplicatePackage { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, IndexError>;
