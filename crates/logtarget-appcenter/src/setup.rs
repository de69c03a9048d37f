//! Registration and setup helpers for the AppCenter target.

use std::sync::Arc;

use logtarget_core::{CoreError, Layout, SetupBuilder, TargetRegistry};

use crate::config::AppCenterTargetConfig;
use crate::sdk::AppCenterSdk;
use crate::target::AppCenterTarget;

/// Type name of the AppCenter target in configuration files.
pub const TARGET_TYPE: &str = "AppCenter";

/// Make `type = "AppCenter"` available to configuration files.
///
/// Every target built from configuration shares `sdk`.
pub fn register_app_center(registry: &mut TargetRegistry, sdk: Arc<dyn AppCenterSdk>) {
    registry.register(TARGET_TYPE, move |name, options| {
        let config =
            AppCenterTargetConfig::from_table(options).map_err(|e| CoreError::target(name, e))?;
        Ok(Box::new(AppCenterTarget::new(name, config, Arc::clone(&sdk))))
    });
}

/// AppCenter shortcuts for [`SetupBuilder`].
pub trait SetupAppCenterExt {
    /// Write every event to a new AppCenter target.
    ///
    /// `layout` overrides the event name layout, `app_secret` starts the
    /// SDK if needed, and `report_exception_as_crash` enables Crashes.
    #[must_use]
    fn write_to_app_center(
        self,
        sdk: Arc<dyn AppCenterSdk>,
        layout: Option<Layout>,
        app_secret: Option<Layout>,
        report_exception_as_crash: bool,
    ) -> Self;
}

impl SetupAppCenterExt for SetupBuilder {
    fn write_to_app_center(
        self,
        sdk: Arc<dyn AppCenterSdk>,
        layout: Option<Layout>,
        app_secret: Option<Layout>,
        report_exception_as_crash: bool,
    ) -> Self {
        let mut config =
            AppCenterTargetConfig::default().with_crash_reporting(report_exception_as_crash);
        if let Some(layout) = layout {
            config = config.with_layout(layout);
        }
        if let Some(app_secret) = app_secret {
            config = config.with_app_secret(app_secret);
        }
        self.write_to(AppCenterTarget::new(AppCenterTarget::DEFAULT_NAME, config, sdk))
    }
}
