use async_trait::async_trait;
use fvm_backend::{BackendError, SourceFetcher};
use log::{debug, info};
use std::path::{Path, PathBuf};
use tokio::process::Command;

use crate::command::execute;
use crate::refs::{parse_checked_out_ref, parse_remote_tags};

pub const FLUTTER_REPOSITORY: &str = "https://github.com/flutter/flutter.git";

/// Fetches SDK copies by cloning the upstream repository with the `git` CLI.
///
/// Use [`crate::detect_git`] to find the executable.
#[derive(Debug, Clone)]
pub struct GitSource {
    git: PathBuf,
    repository: String,
}

impl GitSource {
    #[must_use]
    pub fn new(git: PathBuf) -> Self {
        Self {
            git,
            repository: FLUTTER_REPOSITORY.to_string(),
        }
    }

    #[must_use]
    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = repository.into();
        self
    }

    #[must_use]
    pub fn repository(&self) -> &str {
        &self.repository
    }

    fn build_command(&self, args: &[&str], cwd: Option<&Path>) -> Command {
        debug!("Building git command: {} {}", self.git.display(), args.join(" "));

        let mut cmd = Command::new(&self.git);
        cmd.args(args);
        cmd.env("GIT_TERMINAL_PROMPT", "0");
        if let Some(cwd) = cwd {
            cmd.current_dir(cwd);
        }
        cmd
    }

    async fn execute(&self, args: &[&str], cwd: Option<&Path>) -> Result<String, BackendError> {
        let label = format!("git {}", args.join(" "));
        execute(self.build_command(args, cwd), &label).await
    }
}

#[async_trait]
impl SourceFetcher for GitSource {
    fn name(&self) -> &'static str {
        "git"
    }

    async fn fetch(&self, identifier: &str, destination: &Path) -> Result<(), BackendError> {
        info!(
            "Cloning {identifier} from {} into {}",
            self.repository,
            destination.display()
        );
        let destination = destination.to_string_lossy();
        self.execute(
            &[
                "clone",
                "-b",
                identifier,
                self.repository.as_str(),
                destination.as_ref(),
            ],
            None,
        )
        .await?;
        Ok(())
    }

    async fn list_remote_tags(&self) -> Result<Vec<String>, BackendError> {
        let output = self
            .execute(&["ls-remote", "--tags", self.repository.as_str()], None)
            .await?;
        Ok(parse_remote_tags(&output))
    }

    async fn current_ref(&self, path: &Path) -> Result<Option<String>, BackendError> {
        let branch = self
            .execute(&["rev-parse", "--abbrev-ref", "HEAD"], Some(path))
            .await?;
        match parse_checked_out_ref(&branch) {
            Some(branch) if branch != "HEAD" => Ok(Some(branch)),
            _ => {
                let tags = self
                    .execute(&["tag", "--points-at", "HEAD"], Some(path))
                    .await?;
                Ok(parse_checked_out_ref(&tags))
            }
        }
    }
}
