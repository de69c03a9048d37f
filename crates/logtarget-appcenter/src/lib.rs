//! logtarget AppCenter - Log target for Microsoft AppCenter Analytics and Crashes.
//!
//! This crate provides:
//! - [`AppCenterTarget`], a [`Target`](logtarget_core::Target) that tracks
//!   every event as an Analytics event
//! - [`EventRecorder`], deriving event names and bounded property maps
//! - [`AttachmentBuilder`], building gzip crash attachments from a directory
//! - The [`AppCenterSdk`] trait the target talks to
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use logtarget_appcenter::SetupAppCenterExt;
//! use logtarget_core::{LogEvent, LogLevel, SetupBuilder};
//!
//! let factory = SetupBuilder::new()
//!     .write_to_app_center(sdk, None, Some("app-secret".parse()?), true)
//!     .build()?;
//! factory.log(&LogEvent::new(LogLevel::Info, "app", "Checkout completed"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

pub mod attachments;
pub mod config;
pub mod error;
pub mod properties;
pub mod recorder;
pub mod sdk;
pub mod setup;
pub mod target;

pub use attachments::{AttachmentBuilder, AttachmentLimits};
pub use config::AppCenterTargetConfig;
pub use error::{AppCenterError, AppCenterResult, SdkError};
pub use properties::{TelemetryProperties, build_properties};
pub use recorder::{CrashReporting, DEFAULT_EVENT_NAME, EVENT_NAME_PROPERTY, EventRecorder};
pub use sdk::{ATTACHMENT_CONTENT_TYPE, AppCenterSdk, AppCenterService, ErrorAttachment};
pub use setup::{SetupAppCenterExt, TARGET_TYPE, register_app_center};
pub use target::AppCenterTarget;
