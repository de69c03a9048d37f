//! Prelude module - commonly used types for convenient import.
//!
//! Use `use logtarget_appcenter::prelude::*;` to import all essential types.

// Errors
pub use crate::{AppCenterError, AppCenterResult, SdkError};

// Target and setup
pub use crate::{AppCenterTarget, AppCenterTargetConfig, SetupAppCenterExt, register_app_center};

// SDK surface
pub use crate::{AppCenterSdk, AppCenterService, ErrorAttachment, TelemetryProperties};
