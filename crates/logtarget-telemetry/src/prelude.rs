//! Prelude module - commonly used types for convenient import.
//!
//! Use `use logtarget_telemetry::prelude::*;` to import all essential types.

pub use crate::{
    DiagnosticsConfig, DiagnosticsFormat, DiagnosticsOutput, TelemetryError, TelemetryResult,
    setup_diagnostics,
};
