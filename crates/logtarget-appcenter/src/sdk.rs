//! The AppCenter SDK surface consumed by the target.
//!
//! The target decides *what* to send; transport, batching and retries
//! belong to the SDK behind [`AppCenterSdk`].

use std::fmt;

use logtarget_core::LogException;

use crate::error::SdkError;
use crate::properties::TelemetryProperties;

/// Content type used for gzip crash attachments.
pub const ATTACHMENT_CONTENT_TYPE: &str = "application/x-zip-compressed";

/// An SDK service that can be started and toggled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppCenterService {
    /// Event analytics.
    Analytics,
    /// Crash and error reporting.
    Crashes,
}

impl fmt::Display for AppCenterService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Analytics => f.write_str("Analytics"),
            Self::Crashes => f.write_str("Crashes"),
        }
    }
}

/// A binary attachment sent along with a crash report.
#[derive(Clone, PartialEq, Eq)]
pub struct ErrorAttachment {
    /// Attachment payload.
    pub data: Vec<u8>,
    /// File name shown in the backend.
    pub file_name: String,
    /// MIME type of `data`.
    pub content_type: String,
}

impl ErrorAttachment {
    /// Create an attachment.
    #[must_use]
    pub fn new(data: Vec<u8>, file_name: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            data,
            file_name: file_name.into(),
            content_type: content_type.into(),
        }
    }
}

impl fmt::Debug for ErrorAttachment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorAttachment")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.data.len())
            .finish()
    }
}

/// Operations of the AppCenter SDK used by the target.
///
/// Implementations must be idempotent with respect to [`start`](Self::start):
/// the target only calls it when [`is_configured`](Self::is_configured)
/// reports `false`.
pub trait AppCenterSdk: Send + Sync {
    /// Whether the SDK has already been started by anyone.
    fn is_configured(&self) -> bool;

    /// Start the SDK with `app_secret` and the given services.
    ///
    /// # Errors
    ///
    /// Returns an error if the SDK refuses to start.
    fn start(&self, app_secret: &str, services: &[AppCenterService]) -> Result<(), SdkError>;

    /// Whether `service` is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be queried.
    fn is_enabled(&self, service: AppCenterService) -> Result<bool, SdkError>;

    /// Enable or disable `service`.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be changed.
    fn set_enabled(&self, service: AppCenterService, enabled: bool) -> Result<(), SdkError>;

    /// Register the application user id.
    fn set_user_id(&self, user_id: &str);

    /// Override the backend base URL.
    fn set_log_url(&self, log_url: &str);

    /// Set the two-letter country code reported to the backend.
    fn set_country_code(&self, country_code: &str);

    /// Track an analytics event.
    fn track_event(&self, name: &str, properties: Option<&TelemetryProperties>);

    /// Report an error as a crash with optional attachments.
    fn track_error(
        &self,
        exception: &LogException,
        properties: Option<&TelemetryProperties>,
        attachments: &[ErrorAttachment],
    );
}
