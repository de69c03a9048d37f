//! logtarget Test - Shared test utilities for the logtarget crates.
//!
//! Provides recording mocks for the SDK and platform seams, event
//! fixtures and temporary directory helpers.
//!
//! # Usage
//!
//! ```rust,ignore
//! use logtarget_appcenter::{AppCenterTarget, AppCenterTargetConfig};
//! use logtarget_test::{MockAppCenterSdk, test_event};
//!
//! let sdk = MockAppCenterSdk::new().configured();
//! let target = AppCenterTarget::new("ac", AppCenterTargetConfig::default(), sdk.handle());
//! target.write(&test_event("Checkout")).unwrap();
//! assert_eq!(sdk.tracked_events().len(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]

pub mod prelude;

pub mod fixtures;
pub mod harness;
pub mod mocks;

pub use fixtures::*;
pub use harness::*;
pub use mocks::*;
