use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File inside an installed SDK holding its self-reported build string.
pub const DESCRIPTOR_FILE: &str = "version";
/// Written by the engine once a fetch has fully completed.
pub const COMPLETION_MARKER: &str = ".fvm-install.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallMarker {
    pub identifier: String,
    pub completed_at: DateTime<Utc>,
}

impl InstallMarker {
    #[must_use]
    pub fn now(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            completed_at: Utc::now(),
        }
    }

    /// Persist the marker into `dir`. The file appears atomically so a reader
    /// never observes a half-written marker.
    pub(crate) async fn write(&self, dir: &Path) -> std::io::Result<()> {
        let staging = dir.join(format!("{COMPLETION_MARKER}.tmp"));
        let contents = serde_json::to_vec_pretty(self).map_err(std::io::Error::other)?;
        tokio::fs::write(&staging, contents).await?;
        tokio::fs::rename(&staging, dir.join(COMPLETION_MARKER)).await
    }

    pub(crate) async fn read(dir: &Path) -> Option<Self> {
        let contents = tokio::fs::read(dir.join(COMPLETION_MARKER)).await.ok()?;
        match serde_json::from_slice(&contents) {
            Ok(marker) => Some(marker),
            Err(error) => {
                warn!(
                    "Ignoring unreadable completion marker in {}: {error}",
                    dir.display()
                );
                None
            }
        }
    }
}

pub(crate) async fn is_complete(dir: &Path) -> bool {
    tokio::fs::try_exists(dir.join(COMPLETION_MARKER))
        .await
        .unwrap_or(false)
}

/// Read the version descriptor of the SDK installed at `dir`.
///
/// An empty descriptor is reported as `InvalidData`.
pub(crate) async fn read_version_number(dir: &Path) -> std::io::Result<String> {
    let contents = tokio::fs::read_to_string(dir.join(DESCRIPTOR_FILE)).await?;
    let number = contents.trim_end_matches(['\n', '\r']).trim();
    if number.is_empty() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "version descriptor is empty",
        ));
    }
    debug!("Version number in {} is {number}", dir.display());
    Ok(number.to_string())
}
