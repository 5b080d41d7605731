use async_trait::async_trait;
use std::path::Path;

use crate::error::BackendError;

/// Materializes SDK source trees and answers questions about the remote
/// repository and local checkouts.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    fn name(&self) -> &'static str;

    /// Materialize `identifier` (a channel branch or a release tag) into
    /// `destination`. The destination must not exist yet.
    async fn fetch(&self, identifier: &str, destination: &Path) -> Result<(), BackendError>;

    /// Every tag published by the remote repository, in remote order.
    async fn list_remote_tags(&self) -> Result<Vec<String>, BackendError>;

    /// Branch checked out at `path`, or the tag pointing at `HEAD` when the
    /// checkout is detached. `None` when neither is available.
    async fn current_ref(&self, path: &Path) -> Result<Option<String>, BackendError>;
}

/// Runs the SDK's own first-time setup so that it writes its version
/// descriptor.
#[async_trait]
pub trait Bootstrapper: Send + Sync {
    fn name(&self) -> &'static str;

    async fn bootstrap(&self, sdk_root: &Path) -> Result<(), BackendError>;
}
