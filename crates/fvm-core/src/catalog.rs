use fvm_backend::Version;
use log::{debug, trace};
use std::path::PathBuf;

use crate::config::WorkspaceConfig;
use crate::descriptor::{InstallMarker, is_complete, read_version_number};
use crate::error::EngineError;
use crate::resolver::ActiveVersionResolver;

#[derive(Clone)]
pub struct VersionCatalog {
    config: WorkspaceConfig,
    resolver: ActiveVersionResolver,
}

impl VersionCatalog {
    #[must_use]
    pub fn new(config: WorkspaceConfig, resolver: ActiveVersionResolver) -> Self {
        Self { config, resolver }
    }

    #[must_use]
    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    #[must_use]
    pub fn resolver(&self) -> &ActiveVersionResolver {
        &self.resolver
    }

    /// Installed versions sorted by name, with the active one flagged.
    ///
    /// A workspace that does not exist yet is empty. Directories without a
    /// completion marker are partial fetches and are not listed.
    pub async fn list(&self) -> Result<Vec<Version>, EngineError> {
        let mut versions = Vec::new();
        for (name, dir) in self.entries().await? {
            if !is_complete(&dir).await {
                trace!("Skipping incomplete workspace entry {name}");
                continue;
            }

            let number = read_version_number(&dir).await.unwrap_or_default();
            let installed_at = InstallMarker::read(&dir)
                .await
                .map(|marker| marker.completed_at);
            versions.push(Version {
                installed_at,
                ..Version::installed(name, number)
            });
        }

        if !versions.is_empty() {
            // A link that resolves outside the workspace names no entry, even
            // when its checked out ref matches one.
            let active = self.resolver.resolve().await;
            for version in &mut versions {
                version.active = active.is_linked_to_entry(&version.name);
            }
        }

        versions.sort_by(|a, b| a.name.cmp(&b.name));
        debug!("Catalog lists {} installed version(s)", versions.len());
        Ok(versions)
    }

    /// Exact-name lookup among installed versions.
    pub async fn find(&self, name: &str) -> Result<Option<Version>, EngineError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .find(|version| version.name == name))
    }

    /// Workspace directories left behind by fetches that never completed.
    pub async fn incomplete(&self) -> Result<Vec<String>, EngineError> {
        let mut names = Vec::new();
        for (name, dir) in self.entries().await? {
            if !is_complete(&dir).await {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    async fn entries(&self) -> Result<Vec<(String, PathBuf)>, EngineError> {
        let mut read_dir = match tokio::fs::read_dir(&self.config.root).await {
            Ok(read_dir) => read_dir,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                debug!(
                    "Workspace {} does not exist yet",
                    self.config.root.display()
                );
                return Ok(Vec::new());
            }
            Err(error) => return Err(EngineError::io("reading workspace", &error)),
        };

        let mut entries = Vec::new();
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|error| EngineError::io("reading workspace", &error))?
        {
            let is_dir = entry
                .file_type()
                .await
                .is_ok_and(|file_type| file_type.is_dir());
            if !is_dir {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            entries.push((name, entry.path()));
        }
        Ok(entries)
    }
}
