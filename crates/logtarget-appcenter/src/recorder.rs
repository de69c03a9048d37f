//! Turns log events into AppCenter analytics events and crash reports.

use std::path::PathBuf;
use std::sync::Arc;

use logtarget_core::{Layout, LogEvent, TargetContext};
use tracing::warn;

use crate::attachments::AttachmentBuilder;
use crate::properties::{TelemetryProperties, build_properties};
use crate::sdk::{AppCenterSdk, ErrorAttachment};

/// Event name used when the layout renders blank but properties exist.
pub const DEFAULT_EVENT_NAME: &str = "AppCenterTarget";

/// Property carrying the event name on crash reports.
pub const EVENT_NAME_PROPERTY: &str = "EventName";

/// Crash reporting settings of a recorder.
#[derive(Debug, Clone, Default)]
pub struct CrashReporting {
    /// Directory layout whose files are attached to crash reports.
    pub attachment_directory: Layout,
    /// Builder used for the attachments.
    pub attachments: AttachmentBuilder,
}

/// Records log events through an [`AppCenterSdk`].
///
/// Runs synchronously on the calling thread; nothing is queued.
pub struct EventRecorder {
    layout: Layout,
    context: TargetContext,
    crash_reporting: Option<CrashReporting>,
    sdk: Arc<dyn AppCenterSdk>,
}

impl std::fmt::Debug for EventRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRecorder")
            .field("layout", &self.layout.as_str())
            .field("context", &self.context)
            .field("crash_reporting", &self.crash_reporting)
            .finish_non_exhaustive()
    }
}

impl EventRecorder {
    /// Create a recorder rendering event names with `layout`.
    #[must_use]
    pub fn new(layout: Layout, context: TargetContext, sdk: Arc<dyn AppCenterSdk>) -> Self {
        Self {
            layout,
            context,
            crash_reporting: None,
            sdk,
        }
    }

    /// Also report events carrying an exception as crashes.
    #[must_use]
    pub fn with_crash_reporting(mut self, crash_reporting: CrashReporting) -> Self {
        self.crash_reporting = Some(crash_reporting);
        self
    }

    /// Whether exceptions are reported as crashes.
    #[must_use]
    pub fn reports_crashes(&self) -> bool {
        self.crash_reporting.is_some()
    }

    /// Record one event.
    ///
    /// Always tracks an analytics event. When crash reporting is on and
    /// the event carries an exception, a crash report is sent first.
    pub fn record(&self, event: &LogEvent) {
        let properties = build_properties(&self.context, event);
        let event_name = self.event_name(event, properties.as_ref());
        self.track(&event_name, event, properties);
    }

    /// Render the event name, falling back when it comes out blank.
    ///
    /// The fallback is the exception type name, then
    /// [`DEFAULT_EVENT_NAME`] if there are properties. With neither, the
    /// blank name is kept and left for the SDK to reject.
    #[must_use]
    pub fn event_name(&self, event: &LogEvent, properties: Option<&TelemetryProperties>) -> String {
        let name = self.layout.render(event);
        if !name.trim().is_empty() {
            return name;
        }
        if let Some(exception) = &event.exception {
            exception.type_name.clone()
        } else if properties.is_some_and(|p| !p.is_empty()) {
            DEFAULT_EVENT_NAME.to_owned()
        } else {
            name
        }
    }

    fn track(&self, event_name: &str, event: &LogEvent, mut properties: Option<TelemetryProperties>) {
        if let (Some(crash_reporting), Some(exception)) = (&self.crash_reporting, &event.exception) {
            let attachments = self.crash_attachments(crash_reporting, event);
            let crash_properties = properties.get_or_insert_with(TelemetryProperties::new);
            crash_properties.insert_within_capacity(EVENT_NAME_PROPERTY, event_name);
            self.sdk
                .track_error(exception, Some(&*crash_properties), &attachments);
        }

        self.sdk.track_event(event_name, properties.as_ref());
    }

    /// Attachments for a crash report.
    ///
    /// A failed build is already logged by the builder; the crash report
    /// then goes out without attachments.
    fn crash_attachments(
        &self,
        crash_reporting: &CrashReporting,
        event: &LogEvent,
    ) -> Vec<ErrorAttachment> {
        let directory = crash_reporting.attachment_directory.render(event);
        if directory.trim().is_empty() {
            return Vec::new();
        }
        let directory = PathBuf::from(directory);
        crash_reporting
            .attachments
            .build(&directory)
            .unwrap_or_else(|e| {
                warn!(
                    path = %directory.display(),
                    error = %e,
                    "Sending crash report without attachments"
                );
                Vec::new()
            })
    }
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use std::sync::Mutex;

    use logtarget_core::{ContextProperty, LogException, LogLevel, PropertyInclusion};

    use super::*;
    use crate::error::SdkError;
    use crate::properties::{MAX_EVENT_NAME_LENGTH, MAX_PROPERTY_COUNT};
    use crate::sdk::AppCenterService;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Event(String, Option<TelemetryProperties>),
        Error(String, Option<TelemetryProperties>, Vec<String>),
    }

    #[derive(Default)]
    struct FakeSdk {
        calls: Mutex<Vec<Call>>,
    }

    impl FakeSdk {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl AppCenterSdk for FakeSdk {
        fn is_configured(&self) -> bool {
            true
        }

        fn start(&self, _: &str, _: &[AppCenterService]) -> Result<(), SdkError> {
            Ok(())
        }

        fn is_enabled(&self, _: AppCenterService) -> Result<bool, SdkError> {
            Ok(true)
        }

        fn set_enabled(&self, _: AppCenterService, _: bool) -> Result<(), SdkError> {
            Ok(())
        }

        fn set_user_id(&self, _: &str) {}

        fn set_log_url(&self, _: &str) {}

        fn set_country_code(&self, _: &str) {}

        fn track_event(&self, name: &str, properties: Option<&TelemetryProperties>) {
            self.calls
                .lock()
                .unwrap()
                .push(Call::Event(name.to_owned(), properties.cloned()));
        }

        fn track_error(
            &self,
            exception: &LogException,
            properties: Option<&TelemetryProperties>,
            attachments: &[ErrorAttachment],
        ) {
            self.calls.lock().unwrap().push(Call::Error(
                exception.type_name.clone(),
                properties.cloned(),
                attachments.iter().map(|a| a.file_name.clone()).collect(),
            ));
        }
    }

    fn recorder(layout: &str, context: TargetContext) -> (EventRecorder, Arc<FakeSdk>) {
        let sdk = Arc::new(FakeSdk::default());
        let recorder = EventRecorder::new(Layout::parse(layout).unwrap(), context, sdk.clone());
        (recorder, sdk)
    }

    fn io_error() -> LogException {
        LogException::new("std::io::Error", "broken pipe")
    }

    #[test]
    fn test_records_event_with_rendered_name() {
        let (recorder, sdk) = recorder("${message}", TargetContext::default());
        recorder.record(&LogEvent::new(LogLevel::Info, "app", "Checkout").with_property("cart", 3));

        let expected: TelemetryProperties = [("cart", "3")].into_iter().collect();
        assert_eq!(
            sdk.calls(),
            vec![Call::Event("Checkout".into(), Some(expected))]
        );
    }

    #[test]
    fn test_blank_name_falls_back_to_exception_type() {
        let (recorder, _) = recorder("${message}", TargetContext::default());
        let event = LogEvent::new(LogLevel::Error, "app", "   ").with_exception(io_error());
        assert_eq!(recorder.event_name(&event, None), "std::io::Error");
    }

    #[test]
    fn test_blank_name_falls_back_to_default_with_properties() {
        let (recorder, sdk) = recorder("${message}", TargetContext::default());
        recorder.record(&LogEvent::new(LogLevel::Info, "app", "").with_property("k", "v"));

        assert!(matches!(&sdk.calls()[0], Call::Event(name, Some(_)) if name == DEFAULT_EVENT_NAME));
    }

    #[test]
    fn test_blank_name_without_properties_stays_blank() {
        let (recorder, sdk) = recorder("${message}", TargetContext::default());
        recorder.record(&LogEvent::new(LogLevel::Info, "app", ""));
        assert_eq!(sdk.calls(), vec![Call::Event(String::new(), None)]);
    }

    #[test]
    fn test_exception_without_crash_reporting_only_tracks_event() {
        let (recorder, sdk) = recorder("${message}", TargetContext::default());
        recorder.record(&LogEvent::new(LogLevel::Error, "app", "failed").with_exception(io_error()));
        assert_eq!(sdk.calls(), vec![Call::Event("failed".into(), None)]);
    }

    #[test]
    fn test_crash_reporting_is_opt_in() {
        let (recorder, _) = recorder("${message}", TargetContext::default());
        assert!(!recorder.reports_crashes());
        assert!(recorder.with_crash_reporting(CrashReporting::default()).reports_crashes());
    }

    #[test]
    fn test_long_event_name_is_sent_untruncated() {
        let name = "n".repeat(MAX_EVENT_NAME_LENGTH + 1);
        let (recorder, sdk) = recorder("${message}", TargetContext::default());
        recorder.record(&LogEvent::new(LogLevel::Info, "app", name.clone()));
        assert_eq!(sdk.calls(), vec![Call::Event(name, None)]);
    }

    #[test]
    fn test_crash_report_and_event_share_properties() {
        let (recorder, sdk) = recorder("${message}", TargetContext::default());
        let recorder = recorder.with_crash_reporting(CrashReporting::default());
        recorder.record(&LogEvent::new(LogLevel::Error, "app", "failed").with_exception(io_error()));

        let expected: TelemetryProperties = [(EVENT_NAME_PROPERTY, "failed")].into_iter().collect();
        assert_eq!(
            sdk.calls(),
            vec![
                Call::Error("std::io::Error".into(), Some(expected.clone()), vec![]),
                Call::Event("failed".into(), Some(expected)),
            ]
        );
    }

    #[test]
    fn test_event_name_not_injected_into_full_map() {
        let mut event = LogEvent::new(LogLevel::Error, "app", "failed").with_exception(io_error());
        for i in 0..MAX_PROPERTY_COUNT {
            event = event.with_property(format!("p{i}"), i);
        }
        let (recorder, sdk) = recorder("${message}", TargetContext::default());
        let recorder = recorder.with_crash_reporting(CrashReporting::default());
        recorder.record(&event);

        let calls = sdk.calls();
        let Call::Error(_, Some(properties), _) = &calls[0] else {
            panic!("expected a crash report first");
        };
        assert_eq!(properties.len(), MAX_PROPERTY_COUNT);
        assert_eq!(properties.get(EVENT_NAME_PROPERTY), None);
    }

    #[test]
    fn test_crash_report_carries_attachments() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("trace.log"), "trace").unwrap();

        let (recorder, sdk) = recorder("${message}", TargetContext::default());
        let recorder = recorder.with_crash_reporting(CrashReporting {
            attachment_directory: Layout::literal(dir.path().to_string_lossy()),
            attachments: AttachmentBuilder::new(),
        });
        recorder.record(&LogEvent::new(LogLevel::Fatal, "app", "boom").with_exception(io_error()));

        assert!(matches!(
            &sdk.calls()[0],
            Call::Error(_, _, files) if files == &vec!["trace.log.gz".to_owned()]
        ));
    }

    #[test]
    fn test_attachment_failure_does_not_block_tracking() {
        let dir = tempfile::tempdir().unwrap();
        let (recorder, sdk) = recorder("${message}", TargetContext::default());
        let recorder = recorder.with_crash_reporting(CrashReporting {
            attachment_directory: Layout::literal(dir.path().join("gone").to_string_lossy()),
            attachments: AttachmentBuilder::new(),
        });
        recorder.record(&LogEvent::new(LogLevel::Fatal, "app", "boom").with_exception(io_error()));

        let calls = sdk.calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(&calls[0], Call::Error(_, _, files) if files.is_empty()));
        assert!(matches!(&calls[1], Call::Event(name, _) if name == "boom"));
    }

    #[test]
    fn test_context_properties_used_when_event_properties_disabled() {
        let context = TargetContext::new(PropertyInclusion::disabled())
            .with_context_property(ContextProperty::new("env", Layout::literal("prod")))
            .with_context_property(ContextProperty::new("empty", Layout::default()));
        let (recorder, sdk) = recorder("${message}", context);
        recorder.record(&LogEvent::new(LogLevel::Info, "app", "Started").with_property("ignored", 1));

        let expected: TelemetryProperties = [("env", "prod")].into_iter().collect();
        assert_eq!(sdk.calls(), vec![Call::Event("Started".into(), Some(expected))]);
    }
}
