//! logtarget Core - Log event model and target plumbing.
//!
//! This crate provides:
//! - [`LogEvent`], [`LogLevel`] and [`LogException`]
//! - [`Layout`] templates rendered against events
//! - [`TargetContext`] for collecting context properties
//! - [`StringDictionary`], a string view over object-valued properties
//! - The [`Target`] trait, the [`TargetRegistry`] and rule-based dispatch
//!
//! # Example
//!
//! ```rust
//! use logtarget_core::{Layout, LogEvent, LogLevel};
//!
//! let layout = Layout::parse("${level}|${message}").unwrap();
//! let event = LogEvent::new(LogLevel::Info, "app", "started");
//! assert_eq!(layout.render(&event), "Info|started");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod layout;
pub mod level;
pub mod string_dictionary;
pub mod target;

pub use config::{LogFactory, LoggingConfiguration, LoggingRule, SetupBuilder};
pub use context::{ContextProperty, PropertyInclusion, TargetContext};
pub use error::{CoreError, CoreResult};
pub use event::{EventProperties, LogEvent, LogException};
pub use layout::Layout;
pub use level::LogLevel;
pub use string_dictionary::{StringDictionary, value_to_string};
pub use target::{Target, TargetFactory, TargetRegistry};
