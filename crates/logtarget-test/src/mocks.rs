//! Mock implementations for testing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use logtarget_appcenter::{
    AppCenterSdk, AppCenterService, ErrorAttachment, SdkError, TelemetryProperties,
};
use logtarget_core::LogException;
use logtarget_native::{DebuggerChannel, OsLog, OsLogLevel};

/// A call received by [`MockAppCenterSdk`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SdkCall {
    /// `start(app_secret, services)`.
    Start {
        /// Secret passed to the SDK.
        app_secret: String,
        /// Services requested.
        services: Vec<AppCenterService>,
    },
    /// `set_enabled(service, enabled)`.
    SetEnabled(AppCenterService, bool),
    /// `set_user_id`.
    SetUserId(String),
    /// `set_log_url`.
    SetLogUrl(String),
    /// `set_country_code`.
    SetCountryCode(String),
    /// `track_event(name, properties)`.
    TrackEvent {
        /// Event name.
        name: String,
        /// Properties, if any.
        properties: Option<TelemetryProperties>,
    },
    /// `track_error(exception, properties, attachments)`.
    TrackError {
        /// The reported exception.
        exception: LogException,
        /// Properties, if any.
        properties: Option<TelemetryProperties>,
        /// Attachment file names.
        attachments: Vec<String>,
    },
}

#[derive(Debug, Default)]
struct SdkState {
    configured: bool,
    start_error: Option<String>,
    enable_errors: HashMap<AppCenterService, String>,
    enabled: HashMap<AppCenterService, bool>,
    attachments: Vec<ErrorAttachment>,
    calls: Vec<SdkCall>,
}

/// Mock implementation of [`AppCenterSdk`] recording every call.
///
/// Starts unconfigured with every service disabled. A successful `start`
/// marks the SDK configured and enables the requested services.
#[derive(Debug, Clone, Default)]
pub struct MockAppCenterSdk {
    state: Arc<Mutex<SdkState>>,
}

impl MockAppCenterSdk {
    /// Create a new, unconfigured mock SDK.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend the SDK was already started elsewhere.
    #[must_use]
    pub fn configured(self) -> Self {
        self.with_state(|state| state.configured = true);
        self
    }

    /// Make `start` fail with `message`.
    #[must_use]
    pub fn with_start_error(self, message: impl Into<String>) -> Self {
        let message = message.into();
        self.with_state(|state| state.start_error = Some(message));
        self
    }

    /// Set the initial enabled state of `service`.
    #[must_use]
    pub fn with_enabled(self, service: AppCenterService, enabled: bool) -> Self {
        self.with_state(|state| {
            state.enabled.insert(service, enabled);
        });
        self
    }

    /// Make querying or toggling `service` fail with `message`.
    #[must_use]
    pub fn with_enable_error(self, service: AppCenterService, message: impl Into<String>) -> Self {
        let message = message.into();
        self.with_state(|state| {
            state.enable_errors.insert(service, message);
        });
        self
    }

    /// Shareable handle for target constructors.
    #[must_use]
    pub fn handle(&self) -> Arc<dyn AppCenterSdk> {
        Arc::new(self.clone())
    }

    /// All recorded calls, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<SdkCall> {
        self.with_state(|state| state.calls.clone())
    }

    /// Recorded `start` calls.
    #[must_use]
    pub fn starts(&self) -> Vec<SdkCall> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, SdkCall::Start { .. }))
            .collect()
    }

    /// Recorded `track_event` calls.
    #[must_use]
    pub fn tracked_events(&self) -> Vec<SdkCall> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, SdkCall::TrackEvent { .. }))
            .collect()
    }

    /// Recorded `track_error` calls.
    #[must_use]
    pub fn tracked_errors(&self) -> Vec<SdkCall> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, SdkCall::TrackError { .. }))
            .collect()
    }

    /// Attachments received by the last `track_error` call.
    #[must_use]
    pub fn last_attachments(&self) -> Vec<ErrorAttachment> {
        self.with_state(|state| state.attachments.clone())
    }

    /// Whether `service` is currently enabled.
    #[must_use]
    pub fn service_enabled(&self, service: AppCenterService) -> bool {
        self.with_state(|state| state.enabled.get(&service).copied().unwrap_or(false))
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut SdkState) -> R) -> R {
        let mut guard = self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut guard)
    }
}

impl AppCenterSdk for MockAppCenterSdk {
    fn is_configured(&self) -> bool {
        self.with_state(|state| state.configured)
    }

    fn start(&self, app_secret: &str, services: &[AppCenterService]) -> Result<(), SdkError> {
        self.with_state(|state| {
            state.calls.push(SdkCall::Start {
                app_secret: app_secret.to_owned(),
                services: services.to_vec(),
            });
            if let Some(message) = &state.start_error {
                return Err(SdkError::new(message.clone()));
            }
            state.configured = true;
            for service in services {
                state.enabled.insert(*service, true);
            }
            Ok(())
        })
    }

    fn is_enabled(&self, service: AppCenterService) -> Result<bool, SdkError> {
        self.with_state(|state| match state.enable_errors.get(&service) {
            Some(message) => Err(SdkError::new(message.clone())),
            None => Ok(state.enabled.get(&service).copied().unwrap_or(false)),
        })
    }

    fn set_enabled(&self, service: AppCenterService, enabled: bool) -> Result<(), SdkError> {
        self.with_state(|state| {
            state.calls.push(SdkCall::SetEnabled(service, enabled));
            if let Some(message) = state.enable_errors.get(&service) {
                return Err(SdkError::new(message.clone()));
            }
            state.enabled.insert(service, enabled);
            Ok(())
        })
    }

    fn set_user_id(&self, user_id: &str) {
        self.with_state(|state| state.calls.push(SdkCall::SetUserId(user_id.to_owned())));
    }

    fn set_log_url(&self, log_url: &str) {
        self.with_state(|state| state.calls.push(SdkCall::SetLogUrl(log_url.to_owned())));
    }

    fn set_country_code(&self, country_code: &str) {
        self.with_state(|state| {
            state
                .calls
                .push(SdkCall::SetCountryCode(country_code.to_owned()));
        });
    }

    fn track_event(&self, name: &str, properties: Option<&TelemetryProperties>) {
        self.with_state(|state| {
            state.calls.push(SdkCall::TrackEvent {
                name: name.to_owned(),
                properties: properties.cloned(),
            });
        });
    }

    fn track_error(
        &self,
        exception: &LogException,
        properties: Option<&TelemetryProperties>,
        attachments: &[ErrorAttachment],
    ) {
        self.with_state(|state| {
            state.calls.push(SdkCall::TrackError {
                exception: exception.clone(),
                properties: properties.cloned(),
                attachments: attachments.iter().map(|a| a.file_name.clone()).collect(),
            });
            state.attachments = attachments.to_vec();
        });
    }
}

/// Mock [`OsLog`] capturing every message.
#[derive(Debug, Clone, Default)]
pub struct MockOsLog {
    messages: Arc<Mutex<Vec<(OsLogLevel, String)>>>,
}

impl MockOsLog {
    /// Create a new mock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Shareable handle for target constructors.
    #[must_use]
    pub fn handle(&self) -> Arc<dyn OsLog> {
        Arc::new(self.clone())
    }

    /// Captured messages, in order.
    #[must_use]
    pub fn messages(&self) -> Vec<(OsLogLevel, String)> {
        self.messages
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl OsLog for MockOsLog {
    fn log(&self, level: OsLogLevel, message: &str) {
        if let Ok(mut guard) = self.messages.lock() {
            guard.push((level, message.to_owned()));
        }
    }
}

/// A message captured by [`MockDebuggerChannel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebuggerMessage {
    /// Level ordinal.
    pub level: u8,
    /// Category, if any.
    pub category: Option<String>,
    /// Message text, including the trailing newline.
    pub message: String,
}

/// Mock [`DebuggerChannel`] capturing every message.
#[derive(Debug, Clone)]
pub struct MockDebuggerChannel {
    logging: bool,
    messages: Arc<Mutex<Vec<DebuggerMessage>>>,
}

impl Default for MockDebuggerChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDebuggerChannel {
    /// Create a channel with a debugger attached.
    #[must_use]
    pub fn new() -> Self {
        Self {
            logging: true,
            messages: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a channel with no debugger attached.
    #[must_use]
    pub fn detached() -> Self {
        Self {
            logging: false,
            ..Self::new()
        }
    }

    /// Shareable handle for target constructors.
    #[must_use]
    pub fn handle(&self) -> Arc<dyn DebuggerChannel> {
        Arc::new(self.clone())
    }

    /// Captured messages, in order.
    #[must_use]
    pub fn messages(&self) -> Vec<DebuggerMessage> {
        self.messages
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl DebuggerChannel for MockDebuggerChannel {
    fn is_logging(&self) -> bool {
        self.logging
    }

    fn log(&self, level: u8, category: Option<&str>, message: &str) {
        if let Ok(mut guard) = self.messages.lock() {
            guard.push(DebuggerMessage {
                level,
                category: category.map(str::to_owned),
                message: message.to_owned(),
            });
        }
    }
}
