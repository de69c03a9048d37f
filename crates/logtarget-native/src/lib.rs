//! logtarget Native - Log targets for platform debug facilities.
//!
//! This crate provides:
//! - [`AppleUnifiedTarget`], writing to Apple Unified Logging through an
//!   [`OsLog`] sink
//! - [`DebuggerTarget`], writing to an attached debugger through a
//!   [`DebuggerChannel`]
//! - [`register_native_targets`] for configuration files
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use logtarget_core::{LogEvent, LogLevel, SetupBuilder};
//! use logtarget_native::{DebuggerTarget, DebuggerTargetConfig, StderrDebuggerChannel};
//!
//! let target = DebuggerTarget::new(
//!     "debug",
//!     DebuggerTargetConfig::default(),
//!     Arc::new(StderrDebuggerChannel::default()),
//! );
//! let factory = SetupBuilder::new().write_to(target).build().unwrap();
//! factory.log(&LogEvent::new(LogLevel::Info, "app", "ready"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

pub mod debugger;
pub mod oslog;
pub mod setup;

pub use debugger::{DebuggerChannel, DebuggerTarget, DebuggerTargetConfig, StderrDebuggerChannel};
pub use oslog::{AppleUnifiedTarget, AppleUnifiedTargetConfig, OsLog, OsLogLevel, TracingOsLog};
pub use setup::{PLATFORM_TARGET_TYPE, register_native_targets};
