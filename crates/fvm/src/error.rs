use fvm_backend::BackendError;
use fvm_core::EngineError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppErrorDetail {
    Message(String),
    Engine(EngineError),
    Backend(BackendError),
}

impl std::fmt::Display for AppErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Message(message) => write!(f, "{message}"),
            Self::Engine(error) => write!(f, "{error}"),
            Self::Backend(error) => write!(f, "{error}"),
        }
    }
}

impl From<String> for AppErrorDetail {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}

impl From<&str> for AppErrorDetail {
    fn from(value: &str) -> Self {
        Self::Message(value.to_string())
    }
}

impl From<EngineError> for AppErrorDetail {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<BackendError> for AppErrorDetail {
    fn from(value: BackendError) -> Self {
        Self::Backend(value)
    }
}

impl From<serde_json::Error> for AppErrorDetail {
    fn from(value: serde_json::Error) -> Self {
        Self::Message(value.to_string())
    }
}

/// Failures reported to the user. `main` prints them and exits with status 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    Message(String),
    EnvironmentUnavailable {
        reason: AppErrorDetail,
    },
    OperationFailed {
        operation: &'static str,
        details: AppErrorDetail,
    },
    VersionFetchFailed {
        resource: &'static str,
        details: AppErrorDetail,
    },
}

impl AppError {
    pub fn environment_unavailable(reason: impl Into<AppErrorDetail>) -> Self {
        Self::EnvironmentUnavailable {
            reason: reason.into(),
        }
    }

    pub fn operation_failed(operation: &'static str, details: impl Into<AppErrorDetail>) -> Self {
        Self::OperationFailed {
            operation,
            details: details.into(),
        }
    }

    pub fn version_fetch_failed(
        resource: &'static str,
        details: impl Into<AppErrorDetail>,
    ) -> Self {
        Self::VersionFetchFailed {
            resource,
            details: details.into(),
        }
    }
}

impl From<String> for AppError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}

impl From<&str> for AppError {
    fn from(value: &str) -> Self {
        Self::Message(value.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Message(message) => write!(f, "{message}"),
            Self::EnvironmentUnavailable { reason } => write!(f, "{reason}"),
            Self::OperationFailed { operation, details } => {
                write!(f, "{operation} failed: {details}")
            }
            Self::VersionFetchFailed { resource, details } => {
                write!(f, "{resource} fetch failed: {details}")
            }
        }
    }
}

impl std::error::Error for AppError {}
