use std::collections::BTreeSet;

use pkgscan_config::RemoteConfig;
use pkgscan_index::RepositoryReference;
use pkgscan_remote::{ProjectId, RemoteApi, RemoteError, Transport, UreqTransport};
use rayon::prelude::*;
use serde_json::Value;
use tracing::{debug, trace};

use crate::{
    cache::ManifestCache,
    containment::{filter_nested, parent_dir},
    error::{Result, ScanError},
    manifest::{ManifestParser, PackageXmlParser, MANIFEST_FILE},
    project::{ListingProjectResolver, ProjectResolver},
};

/// Fetches package manifests from repositories on the configured host.
pub struct ManifestProvider<T: Transport, R = ListingProjectResolver, P = PackageXmlParser> {
    api: RemoteApi<T>,
    resolver: R,
    parser: P,
}

impl ManifestProvider<UreqTransport> {
    /// Provider talking to the real service, resolving projects by listing
    /// and parsing `package.xml` manifests.
    pub fn from_config(config: RemoteConfig) -> Result<Self> {
        let transport = UreqTransport::new(&config);
        Self::new(config, transport, ListingProjectResolver, PackageXmlParser)
    }
}

impl<T, R, P> ManifestProvider<T, R, P>
where
    T: Transport,
    R: ProjectResolver,
    P: ManifestParser,
{
    pub fn new(config: RemoteConfig, transport: T, resolver: R, parser: P) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            api: RemoteApi::new(config, transport),
            resolver,
            parser,
        })
    }

    pub fn api(&self) -> &RemoteApi<T> {
        &self.api
    }

    /// Fetches the released manifest of `package_name` straight from the
    /// repository's release tag.
    pub fn fetch_manifest(
        &self,
        repo: &impl RepositoryReference,
        package_name: &str,
    ) -> Result<String> {
        let version = require_version(repo)?;
        let (server, path) = self.checked_url_parts(repo)?;
        let release_tag = repo.release_tag(package_name);

        let project = self.resolver.project_id(&self.api, &path)?;
        let url = self.api.raw_file_url(&project, MANIFEST_FILE, &release_tag);
        debug!(
            "version: {version} server: {server} path: {path} release tag: {release_tag} project: {project}"
        );
        debug!("Loading {MANIFEST_FILE} from {url}");

        Ok(self.api.fetch_text(&url)?)
    }

    /// Finds every top-level package of the repository at its version.
    ///
    /// The version is resolved to a commit first and everything else is read
    /// at that commit. Either the whole repository is processed or an error is
    /// returned.
    pub fn discover(&self, repo: &impl RepositoryReference) -> Result<ManifestCache> {
        let version = require_version(repo)?;
        let (_, path) = self.checked_url_parts(repo)?;

        let project = self.resolver.project_id(&self.api, &path)?;
        let sha = self.resolve_ref(&project, version)?;
        let dirs = filter_nested(&self.discover_manifest_dirs(&project, &sha)?);
        debug!("Found {} packages in {path} at {sha}", dirs.len());

        let mut cache = ManifestCache::new(sha.clone());
        for (dir, manifest) in self.fetch_manifests(&path, &sha, &dirs)? {
            let info = self.parser.parse(&manifest)?;
            cache.insert(info.name, dir, manifest)?;
        }
        Ok(cache)
    }

    /// Resolves a branch or tag to the id of the commit it points at.
    pub fn resolve_ref(&self, project: &ProjectId, version: &str) -> Result<String> {
        let unresolved = || {
            ScanError::Resolution {
                project: project.to_string(),
                version: version.to_string(),
            }
        };

        match self.api.commits(project, version).next() {
            Some(Ok(commit)) => {
                let sha = commit
                    .get("id")
                    .and_then(Value::as_str)
                    .ok_or_else(unresolved)?;
                debug!("Resolved {version} to {sha}");
                Ok(sha.to_string())
            }
            Some(Err(RemoteError::HttpError { status: 404, .. })) | None => Err(unresolved()),
            Some(Err(err)) => Err(err.into()),
        }
    }

    /// Directories that directly contain a manifest at `sha`, nested ones
    /// included.
    pub fn discover_manifest_dirs(
        &self,
        project: &ProjectId,
        sha: &str,
    ) -> Result<BTreeSet<String>> {
        let mut dirs = BTreeSet::new();
        for entry in self.api.tree(project, sha) {
            let entry = entry?;
            let Some(path) = entry.get("path").and_then(Value::as_str) else {
                continue;
            };
            if path.rsplit('/').next() == Some(MANIFEST_FILE) {
                trace!("Found {path}");
                dirs.insert(parent_dir(path).to_string());
            }
        }
        Ok(dirs)
    }

    /// Downloads the manifest of each directory, returned in directory order.
    fn fetch_manifests(
        &self,
        path: &str,
        sha: &str,
        dirs: &BTreeSet<String>,
    ) -> Result<Vec<(String, String)>> {
        let fetch = |dir: &String| -> Result<(String, String)> {
            let url = self.api.web_raw_url(path, sha, &manifest_path(dir));
            debug!("Loading {MANIFEST_FILE} from {url}");
            let manifest = self.api.fetch_text(&url)?;
            Ok((dir.clone(), manifest))
        };

        let jobs = self.api.config().jobs();
        if jobs <= 1 || dirs.len() <= 1 {
            return dirs.iter().map(fetch).collect();
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build()
            .map_err(|err| ScanError::WorkerPool(err.to_string()))?;
        pool.install(|| dirs.par_iter().map(fetch).collect())
    }

    fn checked_url_parts(&self, repo: &impl RepositoryReference) -> Result<(String, String)> {
        let (server, path) = repo.url_parts()?;
        let config = self.api.config();
        if !config.matches_host(&server) {
            debug!("Skipping repository on {server}, only {} is supported", config.host);
            return Err(ScanError::UnsupportedHost {
                server,
                expected: config.host.clone(),
            });
        }
        Ok((server, path))
    }
}

fn require_version(repo: &impl RepositoryReference) -> Result<&str> {
    repo.version()
        .filter(|version| !version.is_empty())
        .ok_or(ScanError::MissingVersion)
}

/// Repository path of the manifest in `dir`.
fn manifest_path(dir: &str) -> String {
    if dir.is_empty() {
        MANIFEST_FILE.to_string()
    } else {
        format!("{dir}/{MANIFEST_FILE}")
    }
}
