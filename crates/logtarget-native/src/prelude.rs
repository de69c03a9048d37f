//! Prelude module - commonly used types for convenient import.
//!
//! Use `use logtarget_native::prelude::*;` to import all essential types.

// Apple Unified Logging
pub use crate::{AppleUnifiedTarget, AppleUnifiedTargetConfig, OsLog, OsLogLevel};

// Debugger
pub use crate::{DebuggerChannel, DebuggerTarget, DebuggerTargetConfig};

// Registration
pub use crate::register_native_targets;
