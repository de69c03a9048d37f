//! The AppCenter log target.

use std::sync::Arc;

use logtarget_core::{CoreError, CoreResult, LogEvent, Target};
use tracing::{debug, error};

use crate::config::AppCenterTargetConfig;
use crate::error::{AppCenterError, AppCenterResult};
use crate::recorder::{CrashReporting, EventRecorder};
use crate::sdk::{AppCenterSdk, AppCenterService};

/// Log target for Microsoft AppCenter.
///
/// Every event becomes an Analytics event. With
/// `report_exception_as_crash`, events carrying an exception are also
/// sent to Crashes, with files from `crash_attachment_directory` attached.
pub struct AppCenterTarget {
    name: String,
    config: AppCenterTargetConfig,
    sdk: Arc<dyn AppCenterSdk>,
    recorder: EventRecorder,
}

impl std::fmt::Debug for AppCenterTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppCenterTarget")
            .field("name", &self.name)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AppCenterTarget {
    /// Default target name.
    pub const DEFAULT_NAME: &'static str = "AppCenter";

    /// Create a target.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        config: AppCenterTargetConfig,
        sdk: Arc<dyn AppCenterSdk>,
    ) -> Self {
        let mut recorder = EventRecorder::new(
            config.layout.clone(),
            config.target_context(),
            Arc::clone(&sdk),
        );
        if config.report_exception_as_crash {
            recorder = recorder.with_crash_reporting(CrashReporting {
                attachment_directory: config.crash_attachment_directory.clone(),
                ..CrashReporting::default()
            });
        }
        Self {
            name: name.into(),
            config,
            sdk,
            recorder,
        }
    }

    /// The target configuration.
    #[must_use]
    pub fn config(&self) -> &AppCenterTargetConfig {
        &self.config
    }

    /// The recorder handling events.
    #[must_use]
    pub fn recorder(&self) -> &EventRecorder {
        &self.recorder
    }

    /// Start the SDK if needed and enable the required services.
    ///
    /// # Errors
    ///
    /// Any SDK failure is logged and returned; the target cannot operate
    /// without a started SDK.
    pub fn start_sdk(&self) -> AppCenterResult<()> {
        let null_event = LogEvent::null_event();
        let crashes = self.config.report_exception_as_crash;

        if !self.sdk.is_configured() {
            let app_secret = self.config.app_secret.render(&null_event);
            if !app_secret.is_empty() {
                debug!(target_name = %self.name, "Starting AppCenter");
                let services: &[AppCenterService] = if crashes {
                    &[AppCenterService::Analytics, AppCenterService::Crashes]
                } else {
                    &[AppCenterService::Analytics]
                };
                self.sdk.start(&app_secret, services).map_err(|e| {
                    error!(target_name = %self.name, error = %e, "Failed to start AppCenter");
                    AppCenterError::SdkStart(e)
                })?;
            }
        }

        self.ensure_enabled(AppCenterService::Analytics)
            .map_err(AppCenterError::EnableAnalytics)?;
        if crashes {
            self.ensure_enabled(AppCenterService::Crashes)
                .map_err(AppCenterError::EnableCrashes)?;
        }

        let user_id = self.config.user_id.render(&null_event);
        if !user_id.is_empty() {
            self.sdk.set_user_id(&user_id);
        }
        let log_url = self.config.log_url.render(&null_event);
        if !log_url.is_empty() {
            self.sdk.set_log_url(&log_url);
        }
        let country_code = self.config.country_code.render(&null_event);
        if !country_code.is_empty() {
            self.sdk.set_country_code(&country_code);
        }

        Ok(())
    }

    fn ensure_enabled(&self, service: AppCenterService) -> Result<(), crate::error::SdkError> {
        let result = match self.sdk.is_enabled(service) {
            Ok(true) => Ok(()),
            Ok(false) => self.sdk.set_enabled(service, true),
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            error!(
                target_name = %self.name,
                service = %service,
                error = %e,
                "Failed to enable AppCenter service"
            );
        }
        result
    }
}

impl Target for AppCenterTarget {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self) -> CoreResult<()> {
        self.start_sdk()
            .map_err(|e| CoreError::target(self.name.clone(), e))
    }

    fn write(&self, event: &LogEvent) -> CoreResult<()> {
        self.recorder.record(event);
        Ok(())
    }
}
