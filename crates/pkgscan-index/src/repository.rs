use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{package::PackageData, source::SourceRepository};

/// Development status of a repository or package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    Developed,
    Maintained,
    Unmaintained,
    EndOfLife,
    Deprecated,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Developed => "developed",
            Status::Maintained => "maintained",
            Status::Unmaintained => "unmaintained",
            Status::EndOfLife => "end-of-life",
            Status::Deprecated => "deprecated",
        };
        f.write_str(s)
    }
}

/// Repository entry as it appears in a test file document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryData {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub vcs_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_tag: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_description: Option<String>,

    /// Explicit packages; a `null` entry means no per-package data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packages: Option<BTreeMap<String, Option<PackageData>>>,

    /// Keys this model does not interpret, kept as written.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// A named repository of a test file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub name: String,
    pub vcs_type: Option<String>,
    pub url: Option<String>,
    pub version: Option<String>,
    pub release_tag: Option<String>,
    pub status: Option<Status>,
    pub status_description: Option<String>,
    /// Explicitly listed packages. Empty means a single package named after
    /// the repository, rooted at the repository root.
    pub package_names: Vec<String>,
    pub extra: BTreeMap<String, Value>,
}

impl Repository {
    pub fn new(name: impl Into<String>, data: &RepositoryData) -> Self {
        Self {
            name: name.into(),
            vcs_type: data.vcs_type.clone(),
            url: data.url.clone(),
            version: data.version.clone(),
            release_tag: data.release_tag.clone(),
            status: data.status,
            status_description: data.status_description.clone(),
            package_names: data
                .packages
                .as_ref()
                .map(|packages| packages.keys().cloned().collect())
                .unwrap_or_default(),
            extra: data.extra.clone(),
        }
    }

    pub fn has_implicit_package(&self) -> bool {
        self.package_names.is_empty()
    }

    /// Source location, if the repository has a URL.
    pub fn source(&self) -> Option<SourceRepository> {
        self.url.as_ref().map(|url| {
            SourceRepository {
                url: url.clone(),
                version: self.version.clone(),
                release_tag: self.release_tag.clone(),
            }
        })
    }

    /// Repository fields of the document form, without the packages block.
    pub fn get_data(&self) -> RepositoryData {
        RepositoryData {
            vcs_type: self.vcs_type.clone(),
            url: self.url.clone(),
            version: self.version.clone(),
            release_tag: self.release_tag.clone(),
            status: self.status,
            status_description: self.status_description.clone(),
            packages: None,
            extra: self.extra.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::source::RepositoryReference;

    #[test]
    fn test_status_serde() {
        let status: Status = serde_json::from_value(json!("end-of-life")).unwrap();
        assert_eq!(status, Status::EndOfLife);
        assert_eq!(status.to_string(), "end-of-life");
        assert_eq!(serde_json::to_value(Status::Developed).unwrap(), json!("developed"));
        assert!(serde_json::from_value::<Status>(json!("abandoned")).is_err());
    }

    #[test]
    fn test_repository_from_data() {
        let data: RepositoryData = serde_json::from_value(json!({
            "type": "git",
            "url": "https://gitlab.example.com/ros/nav.git",
            "version": "main",
            "status": "maintained",
            "packages": {"nav_core": null, "nav_msgs": {"subfolder": "msgs"}}
        }))
        .unwrap();

        let repo = Repository::new("nav", &data);
        assert_eq!(repo.package_names, vec!["nav_core", "nav_msgs"]);
        assert!(!repo.has_implicit_package());
        assert_eq!(repo.status, Some(Status::Maintained));

        let source = repo.source().unwrap();
        assert_eq!(source.version(), Some("main"));
        assert_eq!(
            source.url_parts().unwrap(),
            ("gitlab.example.com".to_string(), "ros/nav".to_string())
        );
    }

    #[test]
    fn test_repository_get_data_skips_packages() {
        let data: RepositoryData = serde_json::from_value(json!({
            "version": "main",
            "packages": {"a": null}
        }))
        .unwrap();

        let repo = Repository::new("r", &data);
        assert_eq!(
            serde_json::to_value(repo.get_data()).unwrap(),
            json!({"version": "main"})
        );
        assert!(repo.source().is_none());
    }

    #[test]
    fn test_unknown_keys_are_kept() {
        let doc = json!({
            "version": "main",
            "source": {"type": "git", "url": "https://h/ros/nav.git"},
            "doc": {"depends": ["a"]}
        });
        let data: RepositoryData = serde_json::from_value(doc.clone()).unwrap();
        assert_eq!(data.extra.len(), 2);

        let repo = Repository::new("nav", &data);
        assert_eq!(serde_json::to_value(repo.get_data()).unwrap(), doc);
    }
}
