//! Descriptors for the repositories and packages of a test suite.
//!
//! A test file is a versioned document mapping repository names to their
//! source location, status and packages:
//!
//! ```
//! use pkgscan_index::TestFile;
//!
//! let doc = r#"{"type": "test", "version": 1, "repositories": {"nav": {"version": "main"}}}"#;
//! let file = TestFile::from_json_str("suite", doc, None).unwrap();
//! assert!(file.package("nav").is_some());
//! ```

pub mod error;
pub mod package;
pub mod repository;
pub mod source;
pub mod test_file;

pub use error::{IndexError, Result};
pub use package::{Package, PackageData};
pub use repository::{Repository, RepositoryData, Status};
pub use source::{RepositoryReference, SourceRepository};
pub use test_file::{TestFile, TestFileData};
