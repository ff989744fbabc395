use pkgscan_remote::{ProjectId, RemoteApi, Transport};
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, ScanError};

/// Maps a `namespace/name` repository path to the identifier used in API
/// paths.
pub trait ProjectResolver: Send + Sync {
    fn project_id<T: Transport>(&self, api: &RemoteApi<T>, path: &str) -> Result<ProjectId>;
}

/// Scans every visible project for one whose name equals the last segment
/// of the path. Costs a full listing per lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListingProjectResolver;

impl ProjectResolver for ListingProjectResolver {
    fn project_id<T: Transport>(&self, api: &RemoteApi<T>, path: &str) -> Result<ProjectId> {
        let path = path.trim_matches('/');
        let name = path.rsplit('/').next().unwrap_or(path);

        for project in api.projects() {
            let project = project?;
            if project.get("name").and_then(Value::as_str) != Some(name) {
                continue;
            }
            if let Some(id) = project.get("id").and_then(Value::as_u64) {
                debug!("Resolved project {path} to id {id}");
                return Ok(ProjectId::numeric(id));
            }
        }

        debug!("Cannot find the project \"{name}\" on {}", api.config().host);
        Err(ScanError::ProjectNotFound(path.to_string()))
    }
}

/// Uses the URL-encoded path itself as the identifier, with no lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathProjectResolver;

impl ProjectResolver for PathProjectResolver {
    fn project_id<T: Transport>(&self, _api: &RemoteApi<T>, path: &str) -> Result<ProjectId> {
        Ok(ProjectId::from_path(path))
    }
}
