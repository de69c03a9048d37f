//! logtarget Telemetry - Diagnostics output for the logging targets.
//!
//! Targets never surface delivery problems to the application; they
//! report them through `tracing`. This crate installs a subscriber for
//! those reports:
//! - Configurable level, directives and format
//! - Standard streams or rolling files
//!
//! # Example
//!
//! ```rust,no_run
//! use logtarget_telemetry::{DiagnosticsConfig, DiagnosticsFormat, setup_diagnostics};
//!
//! # fn main() -> Result<(), logtarget_telemetry::TelemetryError> {
//! let config = DiagnosticsConfig::new("info")
//!     .with_format(DiagnosticsFormat::Json)
//!     .with_directive("logtarget_appcenter=debug");
//!
//! setup_diagnostics(&config)?;
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

mod diagnostics;
mod error;

pub use diagnostics::{
    DiagnosticsConfig, DiagnosticsFile, DiagnosticsFormat, DiagnosticsOutput, FileRotation,
    setup_default_diagnostics, setup_diagnostics,
};
pub use error::{TelemetryError, TelemetryResult};
