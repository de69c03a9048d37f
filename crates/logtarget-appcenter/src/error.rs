//! AppCenter target error types.

use std::path::PathBuf;

use thiserror::Error;

/// Failure reported by the AppCenter SDK.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct SdkError(pub String);

impl SdkError {
    /// Create an SDK error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Errors that can occur in the AppCenter target.
#[derive(Debug, Error)]
pub enum AppCenterError {
    /// The SDK could not be started.
    #[error("failed to start AppCenter: {0}")]
    SdkStart(#[source] SdkError),

    /// Analytics could not be enabled.
    #[error("failed to enable AppCenter.Analytics: {0}")]
    EnableAnalytics(#[source] SdkError),

    /// Crashes could not be enabled.
    #[error("failed to enable AppCenter.Crashes: {0}")]
    EnableCrashes(#[source] SdkError),

    /// Reading or compressing a crash attachment failed.
    #[error("failed to build crash attachments from {}: {source}", path.display())]
    Attachment {
        /// Directory or file being processed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Invalid target configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for AppCenter target operations.
pub type AppCenterResult<T> = Result<T, AppCenterError>;
