use thiserror::Error;

pub type Result<T> = std::result::Result<T, EditorialError>;

#[derive(Error, Debug)]
pub enum EditorialError {
    #[error("Credential error: {0}")]
    CredentialError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),

    #[error("Filesystem error: {0}")]
    FilesystemError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid topic: {0}")]
    InvalidTopic(String),

    #[error("Task wiring error: {0}")]
    WiringError(String),

    #[error("Article not found: {0}")]
    ArticleNotFound(String),
}

/// What the pipeline runner does when generation fails with a given error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    FallbackToMock,
    Propagate,
}

impl EditorialError {
    pub fn failure_policy(&self) -> FailurePolicy {
        match self {
            EditorialError::CredentialError(_) => FailurePolicy::FallbackToMock,
            EditorialError::NetworkError(_) => FailurePolicy::FallbackToMock,
            EditorialError::MalformedResponse(_) => FailurePolicy::FallbackToMock,
            EditorialError::FilesystemError(_) => FailurePolicy::Propagate,
            EditorialError::ConfigError(_) => FailurePolicy::Propagate,
            EditorialError::InvalidTopic(_) => FailurePolicy::Propagate,
            EditorialError::WiringError(_) => FailurePolicy::Propagate,
            EditorialError::ArticleNotFound(_) => FailurePolicy::Propagate,
        }
    }

    pub fn falls_back_to_mock(&self) -> bool {
        self.failure_policy() == FailurePolicy::FallbackToMock
    }
}

// Conversion implementations for common error types
impl From<std::io::Error> for EditorialError {
    fn from(err: std::io::Error) -> Self {
        EditorialError::FilesystemError(err.to_string())
    }
}

impl From<serde_json::Error> for EditorialError {
    fn from(err: serde_json::Error) -> Self {
        EditorialError::MalformedResponse(err.to_string())
    }
}

impl From<toml::de::Error> for EditorialError {
    fn from(err: toml::de::Error) -> Self {
        EditorialError::ConfigError(err.to_string())
    }
}

impl From<reqwest::Error> for EditorialError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            EditorialError::MalformedResponse(err.to_string())
        } else {
            EditorialError::NetworkError(err.to_string())
        }
    }
}
