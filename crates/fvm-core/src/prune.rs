use log::{info, warn};

use crate::catalog::VersionCatalog;
use crate::error::{EngineError, PruneError, PruneFailure};
use crate::lock::WorkspaceLock;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneReport {
    pub removed: Vec<String>,
}

/// Deletes every installed version except the active one.
#[derive(Clone)]
pub struct Pruner {
    catalog: VersionCatalog,
}

impl Pruner {
    #[must_use]
    pub fn new(catalog: VersionCatalog) -> Self {
        Self { catalog }
    }

    /// Inactive versions and leftovers of interrupted fetches are deleted.
    /// Every failure is collected instead of stopping at the first one.
    pub async fn prune(&self) -> Result<PruneReport, EngineError> {
        let config = self.catalog.config();
        if !tokio::fs::try_exists(&config.root).await.unwrap_or(false) {
            return Ok(PruneReport::default());
        }
        let _lock = WorkspaceLock::acquire(&config.root).await?;

        let mut doomed: Vec<String> = self
            .catalog
            .list()
            .await?
            .into_iter()
            .filter(|version| !version.active)
            .map(|version| version.name)
            .collect();
        doomed.extend(self.catalog.incomplete().await?);
        doomed.sort();

        let mut removed = Vec::new();
        let mut failures = Vec::new();
        for name in doomed {
            let dir = config.version_dir(&name);
            match tokio::fs::remove_dir_all(&dir).await {
                Ok(()) => {
                    info!("Pruned {name}");
                    removed.push(name);
                }
                Err(error) => {
                    warn!("Failed to prune {name} at {}: {error}", dir.display());
                    failures.push(PruneFailure {
                        name,
                        kind: error.kind(),
                        message: error.to_string(),
                    });
                }
            }
        }

        if failures.is_empty() {
            Ok(PruneReport { removed })
        } else {
            Err(PruneError { removed, failures }.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    use async_trait::async_trait;
    use fvm_backend::{BackendError, SourceFetcher};

    use super::{PruneReport, Pruner};
    use crate::catalog::VersionCatalog;
    use crate::config::WorkspaceConfig;
    use crate::descriptor::InstallMarker;
    use crate::error::{EngineError, PruneError, PruneFailure};
    use crate::resolver::ActiveVersionResolver;

    struct NoRefs;

    #[async_trait]
    impl SourceFetcher for NoRefs {
        fn name(&self) -> &'static str {
            "none"
        }

        async fn fetch(&self, _identifier: &str, _destination: &Path) -> Result<(), BackendError> {
            Ok(())
        }

        async fn list_remote_tags(&self) -> Result<Vec<String>, BackendError> {
            Ok(Vec::new())
        }

        async fn current_ref(&self, _path: &Path) -> Result<Option<String>, BackendError> {
            Ok(None)
        }
    }

    /// Deletes `doomed` from under the pruner while the active link is being
    /// inspected, like a second process cleaning up at the same time.
    struct ConcurrentCleanup {
        doomed: PathBuf,
    }

    #[async_trait]
    impl SourceFetcher for ConcurrentCleanup {
        fn name(&self) -> &'static str {
            "cleanup"
        }

        async fn fetch(&self, _identifier: &str, _destination: &Path) -> Result<(), BackendError> {
            Ok(())
        }

        async fn list_remote_tags(&self) -> Result<Vec<String>, BackendError> {
            Ok(Vec::new())
        }

        async fn current_ref(&self, _path: &Path) -> Result<Option<String>, BackendError> {
            std::fs::remove_dir_all(&self.doomed)?;
            Ok(None)
        }
    }

    fn pruner(config: &WorkspaceConfig) -> Pruner {
        let resolver = ActiveVersionResolver::new(config.clone(), Arc::new(NoRefs));
        Pruner::new(VersionCatalog::new(config.clone(), resolver))
    }

    fn config(temp_dir: &tempfile::TempDir) -> WorkspaceConfig {
        WorkspaceConfig::new(
            temp_dir.path().join("versions"),
            temp_dir.path().join("flutter"),
        )
    }

    #[tokio::test]
    async fn missing_workspace_prunes_nothing() {
        let temp_dir = tempfile::tempdir().expect("create temp dir");
        let config = config(&temp_dir);

        let report = pruner(&config).prune().await.expect("prune succeeds");

        assert_eq!(report, PruneReport::default());
        assert!(!config.root.exists());
    }

    #[tokio::test]
    async fn without_active_link_every_version_goes() {
        let temp_dir = tempfile::tempdir().expect("create temp dir");
        let config = config(&temp_dir);
        for name in ["beta", "stable"] {
            let dir = config.version_dir(name);
            std::fs::create_dir_all(&dir).expect("create version dir");
            InstallMarker::now(name).write(&dir).await.expect("marker");
        }
        std::fs::create_dir_all(config.version_dir("dev")).expect("partial fetch");

        let report = pruner(&config).prune().await.expect("prune succeeds");

        assert_eq!(report.removed, vec!["beta", "dev", "stable"]);
        assert!(config.lock_file().exists());
        assert!(!config.version_dir("stable").exists());
    }

    #[tokio::test]
    async fn failed_deletions_are_collected_and_the_rest_still_go() {
        let temp_dir = tempfile::tempdir().expect("create temp dir");
        let config = config(&temp_dir);
        for name in ["alpha", "beta", "gamma"] {
            let dir = config.version_dir(name);
            std::fs::create_dir_all(&dir).expect("create version dir");
            InstallMarker::now(name).write(&dir).await.expect("marker");
        }
        let external = temp_dir.path().join("external-sdk");
        std::fs::create_dir_all(&external).expect("external sdk");
        #[cfg(unix)]
        std::os::unix::fs::symlink(&external, &config.active_link).expect("active link");
        #[cfg(windows)]
        std::os::windows::fs::symlink_dir(&external, &config.active_link).expect("active link");

        let fetcher = Arc::new(ConcurrentCleanup {
            doomed: config.version_dir("beta"),
        });
        let resolver = ActiveVersionResolver::new(config.clone(), fetcher);
        let pruner = Pruner::new(VersionCatalog::new(config.clone(), resolver));

        let error = pruner.prune().await.expect_err("beta cannot be deleted");

        let (removed, failures) = match error {
            EngineError::Prune(PruneError { removed, failures }) => (removed, failures),
            other => panic!("expected an aggregated prune error, got {other:?}"),
        };
        assert_eq!(removed, vec!["alpha", "gamma"]);
        assert!(matches!(
            failures.as_slice(),
            [PruneFailure { name, kind: std::io::ErrorKind::NotFound, .. }] if name == "beta"
        ));
        assert!(!config.version_dir("alpha").exists());
        assert!(!config.version_dir("gamma").exists());
        assert!(external.is_dir());
    }
}
