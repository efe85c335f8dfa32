//! Error types for E2E testing

use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Stale element reference: {0}")]
    StaleElement(String),

    #[error("Timeout after {timeout_ms} ms waiting for: {what}")]
    Timeout { what: String, timeout_ms: u64 },

    #[error("Resolution error: {0}")]
    Resolution(String),

    #[error("Unexpected UI state: {0}")]
    UnexpectedUiState(String),

    #[error("Workspace name is not resolved: {0}")]
    WorkspaceUnresolved(String),

    #[error("Driver error: {0}")]
    Driver(String),

    #[error("Step panicked: {0}")]
    StepPanicked(String),

    #[error("Scenario not found: {0}")]
    ScenarioNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl E2eError {
    pub fn timeout(what: impl Into<String>, timeout: std::time::Duration) -> Self {
        E2eError::Timeout {
            what: what.into(),
            timeout_ms: timeout.as_millis() as u64,
        }
    }

    /// Whether a polling wait may retry after this error.
    pub fn is_transient(&self) -> bool {
        matches!(self, E2eError::ElementNotFound(_) | E2eError::StaleElement(_))
    }
}

pub type E2eResult<T> = Result<T, E2eError>;
