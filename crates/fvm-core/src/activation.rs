use fvm_backend::{Bootstrapper, SourceFetcher, Version};
use log::{debug, info, warn};
use std::sync::Arc;

use crate::catalog::VersionCatalog;
use crate::config::ensure_plain_name;
use crate::descriptor::{InstallMarker, read_version_number};
use crate::error::{EngineError, PartialState};
use crate::link::replace_link;
use crate::lock::WorkspaceLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivationOutcome {
    /// The link already pointed at the requested entry; nothing was touched.
    AlreadyActive,
    Activated {
        fetched: bool,
        previous: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    pub version: Version,
    pub outcome: ActivationOutcome,
    /// Set when the version number could not be determined.
    pub partial: Option<PartialState>,
}

/// Makes one installed version the active one, fetching it first when needed.
#[derive(Clone)]
pub struct ActivationEngine {
    catalog: VersionCatalog,
    fetcher: Arc<dyn SourceFetcher>,
    bootstrapper: Arc<dyn Bootstrapper>,
}

impl ActivationEngine {
    #[must_use]
    pub fn new(
        catalog: VersionCatalog,
        fetcher: Arc<dyn SourceFetcher>,
        bootstrapper: Arc<dyn Bootstrapper>,
    ) -> Self {
        Self {
            catalog,
            fetcher,
            bootstrapper,
        }
    }

    pub async fn activate(&self, name: &str) -> Result<Activation, EngineError> {
        ensure_plain_name(name)?;
        let config = self.catalog.config();
        config.ensure_root().await?;
        let _lock = WorkspaceLock::acquire(&config.root).await?;

        let (mut version, fetched) = match self.catalog.find(name).await? {
            Some(version) => (version, false),
            None => (self.fetch(name).await?, true),
        };

        let state = self.catalog.resolver().resolve().await;
        if !fetched && state.is_linked_to_entry(name) {
            info!("{name} is already active");
            version.active = true;
            let partial = (!version.has_number()).then(|| PartialState {
                name: name.to_string(),
                reason: "version descriptor is missing".to_string(),
            });
            return Ok(Activation {
                version,
                outcome: ActivationOutcome::AlreadyActive,
                partial,
            });
        }

        let previous = state
            .name()
            .filter(|previous| *previous != name)
            .map(str::to_string);
        let target = config.version_dir(name);
        replace_link(&config.active_link, &target)
            .await
            .map_err(|error| {
                EngineError::activation_failed("switching the active link", error)
            })?;
        version.active = true;
        info!(
            "Activated {name} at {} (previous: {})",
            config.active_link.display(),
            previous.as_deref().unwrap_or("none")
        );

        let partial = if version.has_number() {
            None
        } else {
            match self.bootstrap(name).await {
                Ok(number) => {
                    version.number = number;
                    None
                }
                Err(partial) => {
                    warn!("{partial}");
                    Some(partial)
                }
            }
        };

        Ok(Activation {
            version,
            outcome: ActivationOutcome::Activated { fetched, previous },
            partial,
        })
    }

    async fn fetch(&self, name: &str) -> Result<Version, EngineError> {
        let dir = self.catalog.config().version_dir(name);
        if tokio::fs::try_exists(&dir).await.unwrap_or(false) {
            debug!("Removing incomplete fetch of {name} at {}", dir.display());
            tokio::fs::remove_dir_all(&dir)
                .await
                .map_err(|error| EngineError::io("removing incomplete fetch", &error))?;
        }

        info!("Fetching {name} with {}", self.fetcher.name());
        self.fetcher
            .fetch(name, &dir)
            .await
            .map_err(|error| EngineError::fetch_failed(name, error))?;

        let marker = InstallMarker::now(name);
        marker
            .write(&dir)
            .await
            .map_err(|error| EngineError::io("recording completed fetch", &error))?;

        let number = read_version_number(&dir).await.unwrap_or_default();
        Ok(Version {
            installed_at: Some(marker.completed_at),
            ..Version::installed(name, number)
        })
    }

    /// Run the bootstrapper once against the active link and re-read the
    /// descriptor.
    async fn bootstrap(&self, name: &str) -> Result<String, PartialState> {
        let config = self.catalog.config();
        info!(
            "Version number of {name} unknown, running {}",
            self.bootstrapper.name()
        );
        if let Err(error) = self.bootstrapper.bootstrap(&config.active_link).await {
            return Err(PartialState {
                name: name.to_string(),
                reason: error.to_string(),
            });
        }

        read_version_number(&config.version_dir(name))
            .await
            .map_err(|error| PartialState {
                name: name.to_string(),
                reason: error.to_string(),
            })
    }
}
