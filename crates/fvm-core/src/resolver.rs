use fvm_backend::SourceFetcher;
use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::WorkspaceConfig;

/// How the active identifier was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// The link points at a workspace entry; the entry name is the identifier.
    WorkspaceEntry,
    /// The link resolves outside the workspace; the identifier is the branch
    /// or tag checked out there.
    CheckedOutRef,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActiveState {
    Unlinked,
    LinkedTo { name: String, via: LinkKind },
}

impl ActiveState {
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Unlinked => None,
            Self::LinkedTo { name, .. } => Some(name.as_str()),
        }
    }

    /// True when the link already points at the workspace entry `name`.
    #[must_use]
    pub fn is_linked_to_entry(&self, name: &str) -> bool {
        matches!(
            self,
            Self::LinkedTo { name: active, via: LinkKind::WorkspaceEntry } if active == name
        )
    }
}

#[derive(Clone)]
pub struct ActiveVersionResolver {
    config: WorkspaceConfig,
    fetcher: Arc<dyn SourceFetcher>,
}

impl ActiveVersionResolver {
    #[must_use]
    pub fn new(config: WorkspaceConfig, fetcher: Arc<dyn SourceFetcher>) -> Self {
        Self { config, fetcher }
    }

    /// Inspect the active link. A missing or broken link is `Unlinked`, never
    /// an error.
    pub async fn resolve(&self) -> ActiveState {
        let link = &self.config.active_link;
        let Ok(target) = tokio::fs::canonicalize(link).await else {
            debug!("Active link {} is missing or broken", link.display());
            return ActiveState::Unlinked;
        };

        if !tokio::fs::metadata(&target)
            .await
            .is_ok_and(|metadata| metadata.is_dir())
        {
            debug!("Active link {} does not resolve to a directory", link.display());
            return ActiveState::Unlinked;
        }

        if let Some(name) = self.workspace_entry_name(&target).await {
            debug!("Active link points at workspace entry {name}");
            return ActiveState::LinkedTo {
                name,
                via: LinkKind::WorkspaceEntry,
            };
        }

        self.resolve_checked_out_ref(&target).await
    }

    async fn workspace_entry_name(&self, target: &Path) -> Option<String> {
        let root: PathBuf = tokio::fs::canonicalize(&self.config.root).await.ok()?;
        if target.parent()? != root {
            return None;
        }
        target
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }

    async fn resolve_checked_out_ref(&self, target: &Path) -> ActiveState {
        match self.fetcher.current_ref(target).await {
            Ok(Some(name)) => {
                debug!(
                    "Active SDK at {} is outside the workspace, checked out at {name}",
                    target.display()
                );
                ActiveState::LinkedTo {
                    name,
                    via: LinkKind::CheckedOutRef,
                }
            }
            Ok(None) => ActiveState::Unlinked,
            Err(error) => {
                warn!(
                    "Could not determine checked out ref at {}: {error}",
                    target.display()
                );
                ActiveState::Unlinked
            }
        }
    }
}
