use log::debug;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use which::which;

use crate::command::NonInteractive;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitDetection {
    pub path: PathBuf,
    pub version: Option<String>,
    pub in_path: bool,
}

/// Locate a `git` executable, preferring `PATH` over well-known install
/// locations.
pub async fn detect_git() -> Option<GitDetection> {
    if let Ok(path) = which("git") {
        let version = git_version(&path).await;
        debug!("Found git on PATH at {}", path.display());
        return Some(GitDetection {
            path,
            version,
            in_path: true,
        });
    }

    for path in common_git_paths() {
        if path.exists() {
            let version = git_version(&path).await;
            debug!("Found git at {}", path.display());
            return Some(GitDetection {
                path,
                version,
                in_path: false,
            });
        }
    }

    debug!("git was not found");
    None
}

fn common_git_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    #[cfg(target_os = "macos")]
    {
        paths.push(PathBuf::from("/opt/homebrew/bin/git"));
        paths.push(PathBuf::from("/Library/Developer/CommandLineTools/usr/bin/git"));
    }

    #[cfg(unix)]
    {
        paths.push(PathBuf::from("/usr/local/bin/git"));
        paths.push(PathBuf::from("/usr/bin/git"));
    }

    #[cfg(windows)]
    {
        paths.push(PathBuf::from(r"C:\Program Files\Git\cmd\git.exe"));
        if let Some(local_app_data) = dirs::data_local_dir() {
            paths.push(
                local_app_data
                    .join("Programs")
                    .join("Git")
                    .join("cmd")
                    .join("git.exe"),
            );
        }
    }

    paths
}

async fn git_version(path: &Path) -> Option<String> {
    let output = Command::new(path)
        .arg("--version")
        .non_interactive()
        .output()
        .await
        .ok()?;

    if !output.status.success() {
        return None;
    }

    parse_git_version(&String::from_utf8_lossy(&output.stdout))
}

fn parse_git_version(stdout: &str) -> Option<String> {
    let trimmed = stdout.trim();
    let version = trimmed.strip_prefix("git version ").unwrap_or(trimmed);
    (!version.is_empty()).then(|| version.to_string())
}
