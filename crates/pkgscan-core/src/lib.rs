//! Discovery of package manifests in remotely hosted repositories.
//!
//! A [`ManifestProvider`] either fetches the manifest of one known package, or
//! walks the whole repository tree at a resolved commit and collects every
//! top-level package into a [`ManifestCache`].

pub mod cache;
pub mod containment;
pub mod error;
pub mod manifest;
pub mod project;
pub mod provider;

pub use cache::ManifestCache;
pub use error::{Result, ScanError};
pub use manifest::{ManifestInfo, ManifestParser, PackageXmlParser, MANIFEST_FILE};
pub use project::{ListingProjectResolver, PathProjectResolver, ProjectResolver};
pub use provider::ManifestProvider;
