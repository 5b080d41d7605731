use fvm_backend::Version;
use log::info;

use crate::catalog::VersionCatalog;
use crate::error::EngineError;
use crate::link::release_link;
use crate::lock::WorkspaceLock;

/// Deletes one installed version, releasing the active link first when it
/// points at that version.
#[derive(Clone)]
pub struct Remover {
    catalog: VersionCatalog,
}

impl Remover {
    #[must_use]
    pub fn new(catalog: VersionCatalog) -> Self {
        Self { catalog }
    }

    /// Returns the version as it was listed before removal.
    pub async fn remove(&self, name: &str) -> Result<Version, EngineError> {
        let config = self.catalog.config();
        let not_found = || EngineError::NotFound {
            name: name.to_string(),
        };
        if !tokio::fs::try_exists(&config.root).await.unwrap_or(false) {
            return Err(not_found());
        }
        let _lock = WorkspaceLock::acquire(&config.root).await?;

        let version = self.catalog.find(name).await?.ok_or_else(not_found)?;

        if version.active {
            release_link(&config.active_link)
                .await
                .map_err(|error| {
                    EngineError::activation_failed("releasing the active link", error)
                })?;
            info!("Released active link {}", config.active_link.display());
        }

        tokio::fs::remove_dir_all(config.version_dir(name))
            .await
            .map_err(|error| EngineError::io("removing version directory", &error))?;
        info!("Removed {version}");

        Ok(version)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;

    use async_trait::async_trait;
    use fvm_backend::{BackendError, SourceFetcher};

    use super::Remover;
    use crate::catalog::VersionCatalog;
    use crate::config::WorkspaceConfig;
    use crate::descriptor::InstallMarker;
    use crate::error::EngineError;
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

    fn remover(temp_dir: &tempfile::TempDir) -> (WorkspaceConfig, Remover) {
        let config = WorkspaceConfig::new(
            temp_dir.path().join("versions"),
            temp_dir.path().join("flutter"),
        );
        let resolver = ActiveVersionResolver::new(config.clone(), Arc::new(NoRefs));
        let remover = Remover::new(VersionCatalog::new(config.clone(), resolver));
        (config, remover)
    }

    #[tokio::test]
    async fn unknown_name_is_not_found() {
        let temp_dir = tempfile::tempdir().expect("create temp dir");
        let (config, remover) = remover(&temp_dir);
        config.ensure_root().await.expect("workspace");

        assert_eq!(
            remover.remove("beta").await,
            Err(EngineError::NotFound {
                name: "beta".to_string()
            })
        );
    }

    #[tokio::test]
    async fn partial_fetch_is_not_removable_by_name() {
        let temp_dir = tempfile::tempdir().expect("create temp dir");
        let (config, remover) = remover(&temp_dir);
        std::fs::create_dir_all(config.version_dir("dev")).expect("partial fetch");

        let result = remover.remove("dev").await;

        assert!(matches!(result, Err(EngineError::NotFound { .. })));
        assert!(config.version_dir("dev").exists());
    }

    #[tokio::test]
    async fn inactive_version_directory_is_deleted() {
        let temp_dir = tempfile::tempdir().expect("create temp dir");
        let (config, remover) = remover(&temp_dir);
        let dir = config.version_dir("beta");
        std::fs::create_dir_all(&dir).expect("create beta");
        std::fs::write(dir.join("version"), "2.0.0\n").expect("descriptor");
        InstallMarker::now("beta").write(&dir).await.expect("marker");

        let removed = remover.remove("beta").await.expect("beta removed");

        assert_eq!(removed.name, "beta");
        assert_eq!(removed.number, "2.0.0");
        assert!(!dir.exists());
    }
}
