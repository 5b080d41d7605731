use std::path::{Component, Path, PathBuf};

use crate::error::EngineError;
use crate::lock::LOCK_FILE;

/// Locations the engine operates on. Built once by the caller and handed to
/// every component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceConfig {
    pub root: PathBuf,
    pub active_link: PathBuf,
}

impl WorkspaceConfig {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, active_link: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            active_link: active_link.into(),
        }
    }

    #[must_use]
    pub fn version_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    #[must_use]
    pub fn lock_file(&self) -> PathBuf {
        self.root.join(LOCK_FILE)
    }

    /// Create the workspace directory if it does not exist yet.
    pub async fn ensure_root(&self) -> Result<(), EngineError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|error| EngineError::io("creating workspace", &error))
    }
}

/// Reject names that would escape the workspace or address a nested path.
pub(crate) fn ensure_plain_name(name: &str) -> Result<(), EngineError> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(component)), None)
            if component == name && !name.starts_with('.') =>
        {
            Ok(())
        }
        _ => Err(EngineError::InvalidVersionIdentifier {
            input: name.to_string(),
        }),
    }
}
