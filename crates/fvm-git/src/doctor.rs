use async_trait::async_trait;
use fvm_backend::{BackendError, Bootstrapper};
use log::info;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use crate::command::execute;

#[cfg(windows)]
const FLUTTER_EXECUTABLE: &str = "flutter.bat";
#[cfg(not(windows))]
const FLUTTER_EXECUTABLE: &str = "flutter";

/// Runs `flutter doctor` from the SDK itself so that a fresh clone downloads
/// its toolchain and writes its version descriptor.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlutterDoctor;

impl FlutterDoctor {
    #[must_use]
    pub fn executable(sdk_root: &Path) -> PathBuf {
        sdk_root.join("bin").join(FLUTTER_EXECUTABLE)
    }
}

#[async_trait]
impl Bootstrapper for FlutterDoctor {
    fn name(&self) -> &'static str {
        "flutter doctor"
    }

    async fn bootstrap(&self, sdk_root: &Path) -> Result<(), BackendError> {
        let flutter = Self::executable(sdk_root);
        if !tokio::fs::try_exists(&flutter).await.unwrap_or(false) {
            return Err(BackendError::NotFound { tool: "flutter" });
        }

        info!("Setting up the SDK at {}", sdk_root.display());
        let mut cmd = Command::new(&flutter);
        cmd.arg("doctor").current_dir(sdk_root);
        execute(cmd, "flutter doctor").await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use fvm_backend::{BackendError, Bootstrapper};

    use super::FlutterDoctor;

    #[test]
    fn executable_lives_in_sdk_bin() {
        let flutter = FlutterDoctor::executable(Path::new("/sdk"));

        assert!(flutter.starts_with(Path::new("/sdk").join("bin")));
    }

    #[tokio::test]
    async fn missing_executable_is_not_found() {
        let temp_dir = tempfile::tempdir().expect("create temp dir");

        let error = FlutterDoctor
            .bootstrap(temp_dir.path())
            .await
            .expect_err("no flutter in an empty dir");

        assert_eq!(error, BackendError::NotFound { tool: "flutter" });
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn doctor_runs_inside_sdk_root() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempfile::tempdir().expect("create temp dir");
        let flutter = FlutterDoctor::executable(temp_dir.path());
        std::fs::create_dir_all(flutter.parent().expect("bin dir")).expect("create bin");
        std::fs::write(&flutter, "#!/bin/sh\n[ \"$1\" = doctor ] && echo 3.0.0 > version\n")
            .expect("write fake flutter");
        std::fs::set_permissions(&flutter, std::fs::Permissions::from_mode(0o755))
            .expect("make fake flutter executable");

        FlutterDoctor
            .bootstrap(temp_dir.path())
            .await
            .expect("doctor succeeds");

        assert_eq!(
            std::fs::read_to_string(temp_dir.path().join("version")).expect("descriptor"),
            "3.0.0\n"
        );
    }
}
