use fvm_backend::{Channel, SourceFetcher};
use log::debug;
use std::sync::Arc;

use crate::error::EngineError;

/// Canonicalizes user-supplied identifiers. Channels are accepted offline;
/// releases must exist among the remote tags.
#[derive(Clone)]
pub struct VersionValidator {
    fetcher: Arc<dyn SourceFetcher>,
}

impl VersionValidator {
    #[must_use]
    pub fn new(fetcher: Arc<dyn SourceFetcher>) -> Self {
        Self { fetcher }
    }

    pub async fn normalize(&self, input: &str) -> Result<String, EngineError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(EngineError::InvalidVersionIdentifier {
                input: input.to_string(),
            });
        }

        if Channel::is_channel(input) {
            return Ok(input.to_string());
        }

        let candidate = if input.starts_with('v') {
            input.to_string()
        } else {
            format!("v{input}")
        };

        let tags = self
            .fetcher
            .list_remote_tags()
            .await
            .map_err(|error| EngineError::fetch_failed(&candidate, error))?;

        if tags.iter().any(|tag| *tag == candidate) {
            debug!("Normalized {input} to release {candidate}");
            Ok(candidate)
        } else {
            Err(EngineError::InvalidVersionIdentifier {
                input: input.to_string(),
            })
        }
    }
}
