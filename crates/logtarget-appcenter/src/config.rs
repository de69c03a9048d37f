//! Configuration of the AppCenter target.

use logtarget_core::{ContextProperty, Layout, LogLevel, PropertyInclusion, TargetContext};
use serde::{Deserialize, Serialize};

use crate::error::{AppCenterError, AppCenterResult};

/// Default event name layout. The backend truncates names at 256 chars.
pub const DEFAULT_LAYOUT: &str = "${message}";

fn default_layout() -> Layout {
    Layout::parse(DEFAULT_LAYOUT).unwrap_or_default()
}

fn default_true() -> bool {
    true
}

/// Options of an AppCenter target.
///
/// Layout-valued options are rendered once against an empty event at
/// initialization, except `layout`, `crash_attachment_directory` and the
/// context properties, which are rendered per event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppCenterTargetConfig {
    /// Event name layout.
    #[serde(default = "default_layout")]
    pub layout: Layout,
    /// Secret used to start the SDK if nothing else has.
    #[serde(default)]
    pub app_secret: Layout,
    /// Application user id registered with the SDK.
    #[serde(default)]
    pub user_id: Layout,
    /// Backend base URL (scheme, authority and port only).
    #[serde(default)]
    pub log_url: Layout,
    /// Two-letter ISO country code sent to the backend.
    #[serde(default)]
    pub country_code: Layout,
    /// Enable Crashes and report exceptions as crashes.
    #[serde(default)]
    pub report_exception_as_crash: bool,
    /// Directory whose files are attached to crash reports.
    #[serde(default)]
    pub crash_attachment_directory: Layout,
    /// Forward all structured event properties.
    #[serde(default = "default_true")]
    pub include_event_properties: bool,
    /// Minimum level for forwarding event properties.
    #[serde(default)]
    pub include_event_properties_min_level: LogLevel,
    /// Named properties used when event properties are not forwarded.
    #[serde(default)]
    pub context_properties: Vec<ContextProperty>,
}

impl Default for AppCenterTargetConfig {
    fn default() -> Self {
        Self {
            layout: default_layout(),
            app_secret: Layout::default(),
            user_id: Layout::default(),
            log_url: Layout::default(),
            country_code: Layout::default(),
            report_exception_as_crash: false,
            crash_attachment_directory: Layout::default(),
            include_event_properties: true,
            include_event_properties_min_level: LogLevel::Trace,
            context_properties: Vec::new(),
        }
    }
}

impl AppCenterTargetConfig {
    /// Parse the options of a `[[targets]]` table.
    ///
    /// # Errors
    ///
    /// Returns [`AppCenterError::Config`] for unknown keys, wrong types or
    /// invalid layouts.
    pub fn from_table(table: toml::Table) -> AppCenterResult<Self> {
        toml::Value::Table(table)
            .try_into()
            .map_err(|e: toml::de::Error| AppCenterError::Config(e.message().to_owned()))
    }

    /// Set the event name layout.
    #[must_use]
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    /// Set the app secret.
    #[must_use]
    pub fn with_app_secret(mut self, app_secret: Layout) -> Self {
        self.app_secret = app_secret;
        self
    }

    /// Report exceptions as crashes.
    #[must_use]
    pub fn with_crash_reporting(mut self, enabled: bool) -> Self {
        self.report_exception_as_crash = enabled;
        self
    }

    /// The property sources described by this configuration.
    #[must_use]
    pub fn target_context(&self) -> TargetContext {
        let inclusion = if self.include_event_properties {
            PropertyInclusion {
                enabled: true,
                min_level: self.include_event_properties_min_level,
            }
        } else {
            PropertyInclusion::disabled()
        };
        TargetContext {
            include_event_properties: inclusion,
            context_properties: self.context_properties.clone(),
        }
    }
}
