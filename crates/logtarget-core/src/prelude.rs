//! Prelude module - commonly used types for convenient import.
//!
//! Use `use logtarget_core::prelude::*;` to import all essential types.

// Errors
pub use crate::{CoreError, CoreResult};

// Events
pub use crate::{LogEvent, LogException, LogLevel};

// Rendering and properties
pub use crate::{ContextProperty, Layout, PropertyInclusion, StringDictionary, TargetContext};

// Targets and configuration
pub use crate::{LogFactory, LoggingConfiguration, LoggingRule, SetupBuilder, Target, TargetRegistry};
