//! Shared helpers for the integration tests.

#![allow(dead_code)]

use logtarget_appcenter::register_app_center;
use logtarget_core::{LogFactory, LoggingConfiguration, TargetRegistry};
use logtarget_native::register_native_targets;
use logtarget_test::{MockAppCenterSdk, MockDebuggerChannel, MockOsLog};

/// Mocks behind every registered target type.
pub struct Harness {
    pub sdk: MockAppCenterSdk,
    pub os_log: MockOsLog,
    pub debugger: MockDebuggerChannel,
    pub registry: TargetRegistry,
}

impl Harness {
    pub fn new(sdk: MockAppCenterSdk) -> Self {
        Self::with_debugger(sdk, MockDebuggerChannel::new())
    }

    pub fn with_debugger(sdk: MockAppCenterSdk, debugger: MockDebuggerChannel) -> Self {
        logtarget_test::setup_test_logging_default();

        let os_log = MockOsLog::new();
        let mut registry = TargetRegistry::new();
        register_app_center(&mut registry, sdk.handle());
        register_native_targets(&mut registry, os_log.handle(), debugger.handle());
        Self {
            sdk,
            os_log,
            debugger,
            registry,
        }
    }

    pub fn load(&self, toml: &str) -> LogFactory {
        let config = LoggingConfiguration::load_from_toml(toml, &self.registry).unwrap();
        LogFactory::initialize(config).unwrap()
    }
}

/// Escape a path for a TOML basic string.
pub fn toml_path(path: &std::path::Path) -> String {
    path.to_string_lossy().replace('\\', "\\\\")
}
