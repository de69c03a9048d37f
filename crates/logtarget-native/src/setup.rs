//! Registration of the native targets.

use std::sync::Arc;

use logtarget_core::TargetRegistry;

use crate::debugger::{DebuggerChannel, DebuggerTarget};
use crate::oslog::{AppleUnifiedTarget, OsLog};

/// Platform-dependent alias: Unified Logging on Apple platforms, the
/// debugger channel everywhere else.
pub const PLATFORM_TARGET_TYPE: &str = "DebugXamarin";

/// Make `AppleUnified`, `Debugger` and `DebugXamarin` available to
/// configuration files.
pub fn register_native_targets(
    registry: &mut TargetRegistry,
    os_log: Arc<dyn OsLog>,
    channel: Arc<dyn DebuggerChannel>,
) {
    {
        let os_log = Arc::clone(&os_log);
        registry.register(AppleUnifiedTarget::TARGET_TYPE, move |name, options| {
            Ok(Box::new(AppleUnifiedTarget::from_table(
                name,
                options,
                Arc::clone(&os_log),
            )?))
        });
    }
    {
        let channel = Arc::clone(&channel);
        registry.register(DebuggerTarget::TARGET_TYPE, move |name, options| {
            Ok(Box::new(DebuggerTarget::from_table(
                name,
                options,
                Arc::clone(&channel),
            )?))
        });
    }

    if cfg!(any(target_os = "macos", target_os = "ios")) {
        registry.register(PLATFORM_TARGET_TYPE, move |name, options| {
            Ok(Box::new(AppleUnifiedTarget::from_table(
                name,
                options,
                Arc::clone(&os_log),
            )?))
        });
    } else {
        registry.register(PLATFORM_TARGET_TYPE, move |name, options| {
            Ok(Box::new(DebuggerTarget::from_table(
                name,
                options,
                Arc::clone(&channel),
            )?))
        });
    }
}
