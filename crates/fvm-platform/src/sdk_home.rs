use log::debug;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::paths::AppPathsError;

/// Overrides the fvm home (`~/fvm` by default).
pub const WORKSPACE_ENV: &str = "FVM_HOME";
/// Overrides the location of the active SDK link.
pub const ACTIVE_LINK_ENV: &str = "FVM_ACTIVE_LINK";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkLocations {
    /// Directory holding one subdirectory per installed SDK.
    pub workspace: PathBuf,
    /// Link that designates the active SDK. Always outside `workspace`.
    pub active_link: PathBuf,
}

/// Resolve SDK locations from the environment and platform defaults.
///
/// # Errors
/// Returns an error when no home directory is available and `FVM_HOME` is
/// not set.
pub fn default_locations() -> Result<SdkLocations, AppPathsError> {
    let fvm_home = match std::env::var_os(WORKSPACE_ENV) {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => dirs::home_dir()
            .ok_or(AppPathsError::HomeDirUnavailable)?
            .join("fvm"),
    };
    let active_link_env = std::env::var_os(ACTIVE_LINK_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from);

    Ok(locations_from(
        &fvm_home,
        active_link_env,
        std::env::var_os("PATH"),
    ))
}

fn locations_from(
    fvm_home: &Path,
    active_link_env: Option<PathBuf>,
    path_var: Option<OsString>,
) -> SdkLocations {
    let workspace = fvm_home.join("versions");
    let active_link = active_link_env
        .or_else(|| {
            path_var
                .as_deref()
                .and_then(|path_var| detect_sdk_home_on_path(path_var, &workspace))
        })
        .unwrap_or_else(|| fvm_home.join("flutter"));

    debug!(
        "SDK locations: workspace={}, active_link={}",
        workspace.display(),
        active_link.display()
    );

    SdkLocations {
        workspace,
        active_link,
    }
}

/// Find the SDK home the user already put on `PATH`: the first entry of the
/// form `<...flutter...>/bin` that does not live inside the workspace.
#[must_use]
pub fn detect_sdk_home_on_path(path_var: &OsStr, workspace: &Path) -> Option<PathBuf> {
    std::env::split_paths(path_var).find_map(|entry| {
        if entry.file_name() != Some(OsStr::new("bin")) {
            return None;
        }
        let home = entry.parent()?;
        let names_flutter = home
            .file_name()
            .is_some_and(|name| name.to_string_lossy().to_lowercase().contains("flutter"));
        if names_flutter && !home.starts_with(workspace) {
            Some(home.to_path_buf())
        } else {
            None
        }
    })
}
