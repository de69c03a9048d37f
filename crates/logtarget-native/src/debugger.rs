//! Attached-debugger target.
//!
//! Output only happens while a debugger is listening; otherwise events are
//! dropped without being rendered.

use std::io::Write;
use std::sync::Arc;

use logtarget_core::{CoreError, CoreResult, Layout, LogEvent, Target};
use serde::{Deserialize, Serialize};

/// Default message layout of the debugger target.
pub const DEFAULT_LAYOUT: &str = "${level}|${message:withException=true:exceptionSeparator=|}";

/// Default category layout of the debugger target.
pub const DEFAULT_CATEGORY: &str = "${logger}";

/// A channel to an attached debugger.
pub trait DebuggerChannel: Send + Sync {
    /// Whether a debugger is currently listening.
    fn is_logging(&self) -> bool;

    /// Send one message. `level` is the event level ordinal.
    fn log(&self, level: u8, category: Option<&str>, message: &str);
}

/// Writes debugger output to standard error.
#[derive(Debug, Clone, Copy)]
pub struct StderrDebuggerChannel {
    enabled: bool,
}

impl StderrDebuggerChannel {
    /// Create a channel that is logging when `enabled`.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl Default for StderrDebuggerChannel {
    fn default() -> Self {
        Self::new(true)
    }
}

impl DebuggerChannel for StderrDebuggerChannel {
    fn is_logging(&self) -> bool {
        self.enabled
    }

    fn log(&self, _level: u8, category: Option<&str>, message: &str) {
        let mut stderr = std::io::stderr().lock();
        let result = match category {
            Some(category) => write!(stderr, "[{category}] {message}"),
            None => write!(stderr, "{message}"),
        };
        if let Err(e) = result {
            tracing::debug!(error = %e, "Failed to write debugger output");
        }
    }
}

fn default_layout() -> Layout {
    Layout::parse(DEFAULT_LAYOUT).unwrap_or_default()
}

fn default_category() -> Layout {
    Layout::parse(DEFAULT_CATEGORY).unwrap_or_default()
}

/// Options of a debugger target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DebuggerTargetConfig {
    /// Message layout.
    #[serde(default = "default_layout")]
    pub layout: Layout,
    /// Category layout; an empty rendering sends no category.
    #[serde(default = "default_category")]
    pub category: Layout,
    /// Written once when the target starts.
    #[serde(default)]
    pub header: Option<Layout>,
    /// Written once when the target closes.
    #[serde(default)]
    pub footer: Option<Layout>,
}

impl Default for DebuggerTargetConfig {
    fn default() -> Self {
        Self {
            layout: default_layout(),
            category: default_category(),
            header: None,
            footer: None,
        }
    }
}

/// Writes events to an attached debugger.
pub struct DebuggerTarget {
    name: String,
    config: DebuggerTargetConfig,
    channel: Arc<dyn DebuggerChannel>,
}

impl std::fmt::Debug for DebuggerTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebuggerTarget")
            .field("name", &self.name)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DebuggerTarget {
    /// Type name in configuration files.
    pub const TARGET_TYPE: &'static str = "Debugger";

    /// Create a target.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        config: DebuggerTargetConfig,
        channel: Arc<dyn DebuggerChannel>,
    ) -> Self {
        Self {
            name: name.into(),
            config,
            channel,
        }
    }

    /// Build from a `[[targets]]` table.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Target`] if the options are invalid.
    pub fn from_table(
        name: &str,
        table: toml::Table,
        channel: Arc<dyn DebuggerChannel>,
    ) -> CoreResult<Self> {
        let config: DebuggerTargetConfig = toml::Value::Table(table)
            .try_into()
            .map_err(|e| CoreError::target(name, e))?;
        Ok(Self::new(name, config, channel))
    }

    fn write_line(&self, layout: &Layout, event: &LogEvent) {
        if !self.channel.is_logging() {
            return;
        }
        let mut message = layout.render(event);
        message.push('\n');
        let category = self.config.category.render(event);
        let category = (!category.is_empty()).then_some(category.as_str());
        self.channel.log(event.level.ordinal(), category, &message);
    }
}

impl Target for DebuggerTarget {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self) -> CoreResult<()> {
        if let Some(header) = &self.config.header {
            self.write_line(header, &LogEvent::lifecycle_event("Starting"));
        }
        Ok(())
    }

    fn write(&self, event: &LogEvent) -> CoreResult<()> {
        self.write_line(&self.config.layout, event);
        Ok(())
    }

    fn close(&mut self) {
        if let Some(footer) = &self.config.footer {
            self.write_line(footer, &LogEvent::lifecycle_event("Closing"));
        }
    }
}
