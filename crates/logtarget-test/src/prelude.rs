//! Prelude module - commonly used types for convenient import.
//!
//! Use `use logtarget_test::prelude::*;` to import all essential types.

// Mocks
pub use crate::{DebuggerMessage, MockAppCenterSdk, MockDebuggerChannel, MockOsLog, SdkCall};

// Fixtures
pub use crate::{test_error_event, test_event, test_event_with_properties, test_exception};

// Harness
pub use crate::{AttachmentDir, setup_test_logging, test_dir};
