use serde::{Deserialize, Serialize};

use crate::repository::{Repository, Status};

/// Per-package overrides as they appear in a test file document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subfolder: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_description: Option<String>,
}

impl PackageData {
    pub fn is_empty(&self) -> bool {
        self.subfolder.is_none() && self.status.is_none() && self.status_description.is_none()
    }
}

/// A package and the repository it lives in.
///
/// Status and description are copied from the repository when the package
/// does not set them. The copy happens once, at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub repository_name: String,
    /// Directory of the package relative to the repository root.
    pub subfolder: String,
    pub status: Option<Status>,
    pub status_description: Option<String>,
    /// Entry exactly as listed; `None` when the document gave `null` or
    /// nothing at all.
    overrides: Option<PackageData>,
}

impl Package {
    pub fn new(
        name: impl Into<String>,
        repository: &Repository,
        data: Option<PackageData>,
        default_subfolder: &str,
    ) -> Self {
        let set = data.clone().unwrap_or_default();
        Self {
            name: name.into(),
            repository_name: repository.name.clone(),
            subfolder: set
                .subfolder
                .unwrap_or_else(|| default_subfolder.to_string()),
            status: set.status.or(repository.status),
            status_description: set
                .status_description
                .or_else(|| repository.status_description.clone()),
            overrides: data,
        }
    }

    /// Entry for the document form: the fields set on the package itself,
    /// or `None` if the package had no entry of its own.
    pub fn get_data(&self) -> Option<PackageData> {
        self.overrides.clone()
    }

    /// Whether the package sets any field itself.
    pub fn has_overrides(&self) -> bool {
        self.overrides.as_ref().is_some_and(|data| !data.is_empty())
    }
}
