//! Error handling for the application

use thiserror::Error;

/// Upstream fetch errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// Connection or request deadline exceeded. Triggers cold restart recovery.
    #[error("Connection timed out: {0}")]
    Timeout(String),

    /// Non-2xx status, transport failure or a body that is not JSON
    #[error("Upstream request failed: {0}")]
    Http(String),
}

/// Object store errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Object store failure: {0}")]
    Retrieval(String),
}

/// Notification channel errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NotifyError {
    #[error("Publish failed: {0}")]
    PublishFailed(String),
}

/// Compute control plane errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComputeError {
    #[error("Configuration update failed: {0}")]
    UpdateFailed(String),
}

/// Cold restart mitigation errors. Logged, never propagated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecoveryError {
    #[error("Failed to step memory to {memory_mb} MB: {source}")]
    StepFailed {
        memory_mb: u32,
        #[source]
        source: ComputeError,
    },

    #[error("Failed to restore memory to {memory_mb} MB: {source}")]
    RestoreFailed {
        memory_mb: u32,
        #[source]
        source: ComputeError,
    },
}

/// Errors that abort a check cycle
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MonitorError {
    #[error("Upstream timeout: {0}")]
    UpstreamTimeout(String),

    #[error("Upstream HTTP error: {0}")]
    UpstreamHttp(String),

    #[error("No {0} prices found")]
    NoData(String),

    #[error("Snapshot retrieval failed: {0}")]
    StoreRetrieval(String),

    #[error("Snapshot save failed: {0}")]
    StoreWrite(String),

    #[error("Alert publish failed: {0}")]
    Notify(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<FetchError> for MonitorError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Timeout(msg) => MonitorError::UpstreamTimeout(msg),
            FetchError::Http(msg) => MonitorError::UpstreamHttp(msg),
        }
    }
}

impl From<NotifyError> for MonitorError {
    fn from(err: NotifyError) -> Self {
        MonitorError::Notify(err.to_string())
    }
}
