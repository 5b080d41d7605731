use fvm_backend::{Channel, SourceFetcher, Version};
use fvm_core::{
    ActivationEngine, ActivationOutcome, ActiveVersionResolver, Pruner, Remover, VersionCatalog,
    VersionValidator, WorkspaceConfig, list_releases,
};
use fvm_git::{FlutterDoctor, GitDetection, GitSource, detect_git};
use fvm_platform::{AppPathsError, SdkLocations, default_locations};
use log::{debug, warn};
use std::path::PathBuf;
use std::sync::Arc;

use crate::cli::{Cli, Command, GlobalArgs};
use crate::error::AppError;
use crate::settings::AppSettings;

/// Flags win over settings; settings win over environment and platform
/// defaults.
pub(crate) fn workspace_config(
    global: &GlobalArgs,
    settings: &AppSettings,
    defaults: impl FnOnce() -> Result<SdkLocations, AppPathsError>,
) -> Result<WorkspaceConfig, AppError> {
    let workspace = global
        .workspace
        .clone()
        .or_else(|| settings.workspace_dir.clone());
    let active_link = global
        .active_link
        .clone()
        .or_else(|| settings.active_link.clone());

    let (workspace, active_link) = match (workspace, active_link) {
        (Some(workspace), Some(active_link)) => (workspace, active_link),
        (workspace, active_link) => {
            let defaults = defaults()
                .map_err(|error| AppError::environment_unavailable(error.to_string()))?;
            (
                workspace.unwrap_or(defaults.workspace),
                active_link.unwrap_or(defaults.active_link),
            )
        }
    };

    Ok(WorkspaceConfig::new(workspace, active_link))
}

struct Context {
    config: WorkspaceConfig,
    source: Arc<GitSource>,
    git: Option<GitDetection>,
    catalog: VersionCatalog,
}

impl Context {
    async fn new(global: &GlobalArgs, settings: &AppSettings) -> Result<Self, AppError> {
        let config = workspace_config(global, settings, default_locations)?;
        debug!(
            "Workspace {}, active link {}",
            config.root.display(),
            config.active_link.display()
        );

        let git = detect_git().await;
        let mut source = GitSource::new(
            git.as_ref()
                .map_or_else(|| PathBuf::from("git"), |detection| detection.path.clone()),
        );
        if let Some(repository) = &settings.flutter_repository {
            source = source.with_repository(repository.clone());
        }
        let source = Arc::new(source);

        let resolver = ActiveVersionResolver::new(config.clone(), source.clone());
        let catalog = VersionCatalog::new(config.clone(), resolver);
        Ok(Self {
            config,
            source,
            git,
            catalog,
        })
    }

    fn require_git(&self) -> Result<(), AppError> {
        if self.git.is_some() {
            Ok(())
        } else {
            Err(AppError::environment_unavailable(
                "git is required but was not found on PATH",
            ))
        }
    }

    /// Installed name for user input, accepting releases without their `v`.
    async fn installed_name(&self, input: &str) -> Result<String, AppError> {
        let list = self
            .catalog
            .list()
            .await
            .map_err(|error| AppError::operation_failed("Listing versions", error))?;
        let prefixed = format!("v{input}");
        Ok(list
            .iter()
            .map(|version| version.name.as_str())
            .find(|name| *name == input || *name == prefixed)
            .unwrap_or(input)
            .to_string())
    }
}

fn format_version(version: &Version) -> String {
    let marker = if version.active { "*" } else { " " };
    format!("{marker} {version}")
}

fn describe_git(git: Option<&GitDetection>) -> String {
    match git {
        Some(GitDetection {
            path,
            version: Some(version),
            ..
        }) => format!("{} ({version})", path.display()),
        Some(detection) => detection.path.display().to_string(),
        None => "not found".to_string(),
    }
}

fn channel_status(channel: Channel, installed: &[Version]) -> String {
    match installed.iter().find(|version| version.name == channel.as_str()) {
        Some(version) if version.active => format!("{channel} (active)"),
        Some(_) => format!("{channel} (installed)"),
        None => channel.to_string(),
    }
}

pub async fn run(cli: Cli, settings: AppSettings) -> Result<(), AppError> {
    let context = Context::new(&cli.global, &settings).await?;

    match cli.command {
        Command::List { json } => list(&context, json).await,
        Command::Use { version } => use_version(&context, &version).await,
        Command::Remove { version } => remove(&context, &version).await,
        Command::Prune => prune(&context).await,
        Command::Releases { limit } => releases(&context, limit).await,
        Command::Channels => channels(&context).await,
        Command::Dir => {
            println!("Workspace:   {}", context.config.root.display());
            println!("Active link: {}", context.config.active_link.display());
            println!("Git:         {}", describe_git(context.git.as_ref()));
            Ok(())
        }
    }
}

async fn list(context: &Context, json: bool) -> Result<(), AppError> {
    let versions = context
        .catalog
        .list()
        .await
        .map_err(|error| AppError::operation_failed("Listing versions", error))?;

    if json {
        let output = serde_json::to_string_pretty(&versions)
            .map_err(|error| AppError::operation_failed("Listing versions", error))?;
        println!("{output}");
    } else if versions.is_empty() {
        println!("No Flutter versions installed. Try `fvm use stable`.");
    } else {
        for version in &versions {
            println!("{}", format_version(version));
        }
    }
    Ok(())
}

async fn use_version(context: &Context, input: &str) -> Result<(), AppError> {
    context.require_git()?;
    let name = VersionValidator::new(context.source.clone())
        .normalize(input)
        .await
        .map_err(|error| AppError::operation_failed("Validating version", error))?;

    let engine = ActivationEngine::new(
        context.catalog.clone(),
        context.source.clone(),
        Arc::new(FlutterDoctor),
    );
    let activation = engine
        .activate(&name)
        .await
        .map_err(|error| AppError::operation_failed("Activation", error))?;

    match &activation.outcome {
        ActivationOutcome::AlreadyActive => {
            println!("{} is already active", activation.version);
        }
        ActivationOutcome::Activated { fetched, previous } => {
            if *fetched {
                println!("Installed {name}");
            }
            match previous {
                Some(previous) => println!("Switched from {previous} to {}", activation.version),
                None => println!("Activated {}", activation.version),
            }
        }
    }
    if let Some(partial) = &activation.partial {
        warn!("{partial}");
    }
    Ok(())
}

async fn remove(context: &Context, input: &str) -> Result<(), AppError> {
    let name = context.installed_name(input).await?;
    let removed = Remover::new(context.catalog.clone())
        .remove(&name)
        .await
        .map_err(|error| AppError::operation_failed("Remove", error))?;

    if removed.active {
        println!("Removed {removed}; no version is active now");
    } else {
        println!("Removed {removed}");
    }
    Ok(())
}

async fn prune(context: &Context) -> Result<(), AppError> {
    let report = Pruner::new(context.catalog.clone())
        .prune()
        .await
        .map_err(|error| AppError::operation_failed("Prune", error))?;

    if report.removed.is_empty() {
        println!("Nothing to prune");
    } else {
        for name in &report.removed {
            println!("Removed {name}");
        }
    }
    Ok(())
}

async fn releases(context: &Context, limit: Option<usize>) -> Result<(), AppError> {
    context.require_git()?;
    let source: &dyn SourceFetcher = context.source.as_ref();
    let releases = list_releases(source)
        .await
        .map_err(|error| AppError::version_fetch_failed("Release list", error))?;

    for release in releases.iter().take(limit.unwrap_or(usize::MAX)) {
        println!("{release}");
    }
    Ok(())
}

async fn channels(context: &Context) -> Result<(), AppError> {
    let installed = context
        .catalog
        .list()
        .await
        .map_err(|error| AppError::operation_failed("Listing versions", error))?;

    for channel in Channel::ALL {
        println!("{}", channel_status(channel, &installed));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use fvm_backend::{Channel, Version};
    use fvm_platform::{AppPathsError, SdkLocations};

    use fvm_git::GitDetection;

    use super::{channel_status, describe_git, format_version, workspace_config};
    use crate::cli::GlobalArgs;
    use crate::settings::AppSettings;

    fn defaults() -> Result<SdkLocations, AppPathsError> {
        Ok(SdkLocations {
            workspace: PathBuf::from("/home/dev/fvm/versions"),
            active_link: PathBuf::from("/home/dev/fvm/flutter"),
        })
    }

    fn global(workspace: Option<&str>, active_link: Option<&str>) -> GlobalArgs {
        GlobalArgs {
            verbose: false,
            workspace: workspace.map(PathBuf::from),
            active_link: active_link.map(PathBuf::from),
        }
    }

    #[test]
    fn defaults_apply_without_overrides() {
        let config = workspace_config(&global(None, None), &AppSettings::default(), defaults)
            .expect("defaults available");

        assert_eq!(config.root, PathBuf::from("/home/dev/fvm/versions"));
        assert_eq!(config.active_link, PathBuf::from("/home/dev/fvm/flutter"));
    }

    #[test]
    fn flags_override_settings() {
        let settings = AppSettings {
            workspace_dir: Some(PathBuf::from("/settings/versions")),
            active_link: Some(PathBuf::from("/settings/flutter")),
            ..AppSettings::default()
        };

        let config = workspace_config(&global(Some("/flag/versions"), None), &settings, defaults)
            .expect("config resolves");

        assert_eq!(config.root, PathBuf::from("/flag/versions"));
        assert_eq!(config.active_link, PathBuf::from("/settings/flutter"));
    }

    #[test]
    fn fully_overridden_paths_skip_platform_defaults() {
        let config = workspace_config(
            &global(Some("/ws"), Some("/link")),
            &AppSettings::default(),
            || Err(AppPathsError::HomeDirUnavailable),
        )
        .expect("no defaults needed");

        assert_eq!(config.root, PathBuf::from("/ws"));
    }

    #[test]
    fn missing_home_is_reported() {
        let error = workspace_config(&global(None, None), &AppSettings::default(), || {
            Err(AppPathsError::HomeDirUnavailable)
        })
        .expect_err("no home directory");

        assert_eq!(error.to_string(), "Could not determine home directory");
    }

    #[test]
    fn active_version_is_starred() {
        let mut stable = Version::installed("stable", "3.0.0");
        stable.active = true;
        let beta = Version::installed("beta", "");

        assert_eq!(format_version(&stable), "* stable (3.0.0)");
        assert_eq!(format_version(&beta), "  beta");
    }

    #[test]
    fn git_description_includes_version_when_known() {
        let git = GitDetection {
            path: PathBuf::from("/usr/bin/git"),
            version: Some("2.43.0".to_string()),
            in_path: true,
        };

        assert_eq!(describe_git(Some(&git)), "/usr/bin/git (2.43.0)");
        assert_eq!(describe_git(None), "not found");
    }

    #[test]
    fn channel_status_reflects_installation() {
        let mut stable = Version::installed("stable", "3.0.0");
        stable.active = true;
        let installed = vec![stable, Version::installed("beta", "")];

        assert_eq!(channel_status(Channel::Stable, &installed), "stable (active)");
        assert_eq!(channel_status(Channel::Beta, &installed), "beta (installed)");
        assert_eq!(channel_status(Channel::Master, &installed), "master");
    }
}
