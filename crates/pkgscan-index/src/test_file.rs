use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use crate::{
    error::{IndexError, Result},
    package::{Package, PackageData},
    repository::{Repository, RepositoryData},
};

pub const DEFAULT_TYPE: &str = "test";
pub const VERSION: u32 = 1;

/// Document form of a test file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestFileData {
    #[serde(rename = "type")]
    pub file_type: String,
    pub version: u32,
    #[serde(default)]
    pub repositories: BTreeMap<String, RepositoryData>,
    /// Top-level keys this model does not interpret, kept as written.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Repositories of a test suite and every package they contain.
#[derive(Debug, Clone)]
pub struct TestFile {
    pub name: String,
    file_type: String,
    repositories: BTreeMap<String, Repository>,
    packages: BTreeMap<String, Package>,
    extra: BTreeMap<String, Value>,
}

impl TestFile {
    /// Builds a test file from its document form.
    ///
    /// Fails when the type tag differs from `expected_type` (default
    /// `"test"`), the version is not 1, or two packages share a name.
    pub fn from_data(
        name: impl Into<String>,
        data: &TestFileData,
        expected_type: Option<&str>,
    ) -> Result<Self> {
        let expected_type = expected_type.unwrap_or(DEFAULT_TYPE);
        if data.file_type != expected_type {
            return Err(IndexError::UnexpectedType {
                expected: expected_type.to_string(),
                found: data.file_type.clone(),
            });
        }
        if data.version != VERSION {
            return Err(IndexError::UnsupportedVersion(data.version));
        }

        let mut file = Self {
            name: name.into(),
            file_type: expected_type.to_string(),
            repositories: BTreeMap::new(),
            packages: BTreeMap::new(),
            extra: data.extra.clone(),
        };

        for (repo_name, repo_data) in &data.repositories {
            let repo = Repository::new(repo_name.clone(), repo_data);

            if repo.has_implicit_package() {
                file.add_package(repo_name, &repo, None, ".")?;
            } else {
                let unary = repo.package_names.len() == 1;
                for pkg_name in &repo.package_names {
                    let pkg_data = repo_data
                        .packages
                        .as_ref()
                        .and_then(|packages| packages.get(pkg_name).cloned().flatten());
                    let subfolder = if unary { "." } else { pkg_name.as_str() };
                    file.add_package(pkg_name, &repo, pkg_data, subfolder)?;
                }
            }

            file.repositories.insert(repo_name.clone(), repo);
        }

        trace!(
            "Loaded test file {} with {} repositories and {} packages",
            file.name,
            file.repositories.len(),
            file.packages.len()
        );
        Ok(file)
    }

    pub fn from_json_str(
        name: impl Into<String>,
        content: &str,
        expected_type: Option<&str>,
    ) -> Result<Self> {
        let data: TestFileData = serde_json::from_str(content)?;
        Self::from_data(name, &data, expected_type)
    }

    fn add_package(
        &mut self,
        name: &str,
        repo: &Repository,
        data: Option<PackageData>,
        default_subfolder: &str,
    ) -> Result<()> {
        if self.packages.contains_key(name) {
            return Err(IndexError::DuplicatePackage {
                name: name.to_string(),
                repository: repo.name.clone(),
            });
        }
        let pkg = Package::new(name, repo, data, default_subfolder);
        self.packages.insert(name.to_string(), pkg);
        Ok(())
    }

    pub fn file_type(&self) -> &str {
        &self.file_type
    }

    pub fn repositories(&self) -> &BTreeMap<String, Repository> {
        &self.repositories
    }

    pub fn repository(&self, name: &str) -> Option<&Repository> {
        self.repositories.get(name)
    }

    pub fn packages(&self) -> &BTreeMap<String, Package> {
        &self.packages
    }

    pub fn package(&self, name: &str) -> Option<&Package> {
        self.packages.get(name)
    }

    /// Document form, with repositories in name order.
    ///
    /// The per-package block of a repository whose only package carries the
    /// repository's name and sets nothing itself is left out, so it reads
    /// back as the implicit root package.
    pub fn get_data(&self) -> TestFileData {
        let repositories = self
            .repositories
            .iter()
            .map(|(repo_name, repo)| {
                let mut repo_data = repo.get_data();
                let unary = repo.package_names.len() == 1;

                for pkg_name in &repo.package_names {
                    let Some(pkg) = self.packages.get(pkg_name) else {
                        continue;
                    };
                    if unary && pkg_name == repo_name && !pkg.has_overrides() {
                        continue;
                    }
                    repo_data
                        .packages
                        .get_or_insert_with(BTreeMap::new)
                        .insert(pkg_name.clone(), pkg.get_data());
                }

                (repo_name.clone(), repo_data)
            })
            .collect();

        TestFileData {
            file_type: self.file_type.clone(),
            version: VERSION,
            repositories,
            extra: self.extra.clone(),
        }
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.get_data())?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::repository::Status;

    fn load(doc: Value) -> Result<TestFile> {
        let data: TestFileData = serde_json::from_value(doc)?;
        TestFile::from_data("suite", &data, None)
    }

    fn round_trip(doc: Value) -> Value {
        serde_json::to_value(load(doc).unwrap().get_data()).unwrap()
    }

    #[test]
    fn test_single_implicit_package() {
        let doc = json!({"type": "test", "version": 1, "repositories": {"repoA": {"version": "main"}}});
        let file = load(doc.clone()).unwrap();

        assert_eq!(file.repositories().len(), 1);
        assert_eq!(file.packages().len(), 1);

        let pkg = file.package("repoA").unwrap();
        assert_eq!(pkg.repository_name, "repoA");
        assert_eq!(pkg.subfolder, ".");

        assert_eq!(round_trip(doc.clone()), doc);
    }

    #[test]
    fn test_round_trip_non_default_fields() {
        let doc = json!({
            "type": "test",
            "version": 1,
            "repositories": {
                "alpha": {
                    "type": "git",
                    "url": "https://gitlab.example.com/ros/alpha.git",
                    "version": "1.0.0",
                    "status": "maintained",
                    "status_description": "stable",
                    "packages": {
                        "alpha_core": {"subfolder": "core", "status": "developed"},
                        "alpha_msgs": {}
                    }
                },
                "beta": {
                    "version": "main",
                    "packages": {"beta_only": {}}
                },
                "gamma": {
                    "version": "main",
                    "packages": {"gamma": {"status_description": "moved"}}
                }
            }
        });

        assert_eq!(round_trip(doc.clone()), doc);
    }

    #[test]
    fn test_round_trip_unknown_keys_and_null_entries() {
        let doc = json!({
            "type": "test",
            "version": 1,
            "name": "nightly",
            "repositories": {
                "nav": {
                    "version": "main",
                    "source": {"type": "git", "url": "https://h/ros/nav.git"}
                },
                "multi": {
                    "version": "main",
                    "packages": {"a": null, "b": null, "c": {}}
                },
                "lone": {
                    "version": "main",
                    "packages": {"lone_pkg": null}
                }
            }
        });

        assert_eq!(round_trip(doc.clone()), doc);
    }

    #[test]
    fn test_unary_null_block_is_omitted() {
        let doc = json!({
            "type": "test",
            "version": 1,
            "repositories": {"nav": {"version": "main", "packages": {"nav": null}}}
        });

        assert_eq!(
            round_trip(doc),
            json!({"type": "test", "version": 1, "repositories": {"nav": {"version": "main"}}})
        );
    }

    #[test]
    fn test_unary_default_block_is_omitted() {
        let doc = json!({
            "type": "test",
            "version": 1,
            "repositories": {"nav": {"version": "main", "packages": {"nav": {}}}}
        });
        let minimal = json!({
            "type": "test",
            "version": 1,
            "repositories": {"nav": {"version": "main"}}
        });

        assert_eq!(round_trip(doc), minimal);
        assert_eq!(round_trip(minimal.clone()), minimal);
    }

    #[test]
    fn test_repositories_serialize_sorted() {
        let file = TestFile::from_json_str(
            "suite",
            r#"{"type": "test", "version": 1, "repositories": {"zeta": {}, "alpha": {}, "mid": {}}}"#,
            None,
        )
        .unwrap();

        let json = file.to_json_string().unwrap();
        let alpha = json.find("\"alpha\"").unwrap();
        let mid = json.find("\"mid\"").unwrap();
        let zeta = json.find("\"zeta\"").unwrap();
        assert!(alpha < mid && mid < zeta);
    }

    #[test]
    fn test_status_inheritance() {
        let file = load(json!({
            "type": "test",
            "version": 1,
            "repositories": {
                "nav": {
                    "status": "end-of-life",
                    "status_description": "use nav2",
                    "packages": {"nav_core": null, "nav_msgs": {"status": "maintained"}}
                }
            }
        }))
        .unwrap();

        let core = file.package("nav_core").unwrap();
        assert_eq!(core.status, Some(Status::EndOfLife));
        assert_eq!(core.status_description.as_deref(), Some("use nav2"));
        assert_eq!(core.subfolder, "nav_core");

        let msgs = file.package("nav_msgs").unwrap();
        assert_eq!(msgs.status, Some(Status::Maintained));
        assert_eq!(msgs.status_description.as_deref(), Some("use nav2"));
    }

    #[test]
    fn test_duplicate_package_across_repositories() {
        let err = load(json!({
            "type": "test",
            "version": 1,
            "repositories": {
                "a": {"packages": {"shared": {}}},
                "b": {"packages": {"shared": {}, "other": {}}}
            }
        }))
        .unwrap_err();

        assert!(err.is_malformed_document());
        assert!(matches!(err, IndexError::DuplicatePackage { ref name, .. } if name == "shared"));
    }

    #[test]
    fn test_implicit_package_clashes_with_explicit() {
        let err = load(json!({
            "type": "test",
            "version": 1,
            "repositories": {
                "a": {"packages": {"b": {}, "c": {}}},
                "b": {}
            }
        }))
        .unwrap_err();

        assert!(matches!(err, IndexError::DuplicatePackage { .. }));
    }

    #[test]
    fn test_wrong_type_or_version() {
        let err = load(json!({"type": "distribution", "version": 1})).unwrap_err();
        assert!(err.is_malformed_document());
        assert!(matches!(err, IndexError::UnexpectedType { .. }));

        let err = load(json!({"type": "test", "version": 2})).unwrap_err();
        assert!(matches!(err, IndexError::UnsupportedVersion(2)));
    }

    #[test]
    fn test_custom_expected_type() {
        let data: TestFileData =
            serde_json::from_value(json!({"type": "custom", "version": 1})).unwrap();
        let file = TestFile::from_data("suite", &data, Some("custom")).unwrap();

        assert_eq!(file.file_type(), "custom");
        assert!(file.repositories().is_empty());
        assert_eq!(
            serde_json::to_value(file.get_data()).unwrap(),
            json!({"type": "custom", "version": 1, "repositories": {}})
        );
    }

    #[test]
    fn test_invalid_json() {
        let err = TestFile::from_json_str("suite", "{", None).unwrap_err();
        assert!(matches!(err, IndexError::JsonError(_)));
        assert!(!err.is_malformed_document());
    }
}
