use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanError};

/// Manifests of every package found in a repository at one commit.
///
/// Maps each package name to its directory (relative to the repository root,
/// `""` for the root) and the raw manifest text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestCache {
    #[serde(rename = "ref")]
    content_ref: String,
    packages: BTreeMap<String, (String, String)>,
}

impl ManifestCache {
    pub fn new(content_ref: impl Into<String>) -> Self {
        Self {
            content_ref: content_ref.into(),
            packages: BTreeMap::new(),
        }
    }

    /// Commit the manifests were read at.
    pub fn content_ref(&self) -> &str {
        &self.content_ref
    }

    /// Adds a package; a name can only be added once.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        subdir: impl Into<String>,
        manifest: impl Into<String>,
    ) -> Result<()> {
        let name = name.into();
        let subdir = subdir.into();

        if let Some((existing, _)) = self.packages.get(&name) {
            return Err(ScanError::DuplicateName {
                name,
                first: existing.clone(),
                second: subdir,
            });
        }
        self.packages.insert(name, (subdir, manifest.into()));
        Ok(())
    }

    /// Directory and manifest text of `name`.
    pub fn get(&self, name: &str) -> Option<(&str, &str)> {
        self.packages
            .get(name)
            .map(|(subdir, manifest)| (subdir.as_str(), manifest.as_str()))
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn package_names(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }

    /// `(name, subdir, manifest)` in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.packages
            .iter()
            .map(|(name, (subdir, manifest))| (name.as_str(), subdir.as_str(), manifest.as_str()))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }
}
