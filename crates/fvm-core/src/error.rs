use fvm_backend::BackendError;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Version not installed: {name}")]
    NotFound { name: String },

    #[error("Invalid version identifier: {input}")]
    InvalidVersionIdentifier { input: String },

    #[error("Failed to fetch {identifier}: {source}")]
    FetchFailed {
        identifier: String,
        #[source]
        source: BackendError,
    },

    #[error("Activation failed while {action}: {details}")]
    ActivationFailed {
        action: &'static str,
        details: String,
    },

    #[error(transparent)]
    Prune(#[from] PruneError),

    #[error("IO error while {context} ({kind}): {message}")]
    Io {
        context: &'static str,
        kind: std::io::ErrorKind,
        message: String,
    },
}

impl EngineError {
    pub fn io(context: &'static str, error: &std::io::Error) -> Self {
        Self::Io {
            context,
            kind: error.kind(),
            message: error.to_string(),
        }
    }

    pub fn activation_failed(action: &'static str, error: impl fmt::Display) -> Self {
        Self::ActivationFailed {
            action,
            details: error.to_string(),
        }
    }

    pub fn fetch_failed(identifier: impl Into<String>, source: BackendError) -> Self {
        Self::FetchFailed {
            identifier: identifier.into(),
            source,
        }
    }
}

/// The descriptor of an activated version could not be read, even after
/// bootstrapping. Reported alongside a successful result, never raised.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Version number of {name} is unknown: {reason}")]
pub struct PartialState {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PruneFailure {
    pub name: String,
    pub kind: std::io::ErrorKind,
    pub message: String,
}

impl fmt::Display for PruneFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}: {})", self.name, self.kind, self.message)
    }
}

/// Every deletion that failed during a prune, plus what was removed anyway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PruneError {
    pub removed: Vec<String>,
    pub failures: Vec<PruneFailure>,
}

impl fmt::Display for PruneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to remove {} version(s): ", self.failures.len())?;
        for (index, failure) in self.failures.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{failure}")?;
        }
        if !self.removed.is_empty() {
            write!(f, "; removed {}", self.removed.join(", "))?;
        }
        Ok(())
    }
}

impl std::error::Error for PruneError {}
