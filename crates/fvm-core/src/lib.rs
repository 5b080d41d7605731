//! Version activation and state reconciliation for installed SDK copies.
//!
//! Every component takes a [`WorkspaceConfig`] at construction time:
//! - [`VersionCatalog`] enumerates installed versions.
//! - [`ActiveVersionResolver`] inspects the active link.
//! - [`VersionValidator`] canonicalizes user-supplied identifiers.
//! - [`ActivationEngine`], [`Pruner`] and [`Remover`] mutate the workspace
//!   while holding the workspace lock.

mod activation;
mod catalog;
mod config;
mod descriptor;
mod error;
mod link;
mod lock;
mod prune;
mod releases;
mod remove;
mod resolver;
mod validator;

pub use activation::{Activation, ActivationEngine, ActivationOutcome};
pub use catalog::VersionCatalog;
pub use config::WorkspaceConfig;
pub use descriptor::{COMPLETION_MARKER, DESCRIPTOR_FILE, InstallMarker};
pub use error::{EngineError, PartialState, PruneError, PruneFailure};
pub use lock::{LOCK_FILE, WorkspaceLock};
pub use prune::{PruneReport, Pruner};
pub use releases::{list_releases, sort_releases};
pub use remove::Remover;
pub use resolver::{ActiveState, ActiveVersionResolver, LinkKind};
pub use validator::VersionValidator;
