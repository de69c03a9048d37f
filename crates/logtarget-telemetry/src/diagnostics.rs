//! Diagnostics subscriber configuration and setup.
//!
//! Targets report their own failures through `tracing`; this module
//! installs the subscriber that makes those reports visible.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::error::{TelemetryError, TelemetryResult};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn init_err<E: std::fmt::Display>(e: E) -> TelemetryError {
    TelemetryError::InitError(e.to_string())
}

/// Output format of diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticsFormat {
    /// Multi-line, human-readable.
    Pretty,
    /// Single-line (default).
    #[default]
    Compact,
    /// One JSON object per line.
    Json,
}

/// Where diagnostics are written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticsOutput {
    /// Standard output.
    Stdout,
    /// Standard error.
    #[default]
    Stderr,
    /// Rolling files in a directory.
    File(PathBuf),
}

/// File rotation strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileRotation {
    /// Rotate daily.
    #[default]
    Daily,
    /// Rotate hourly.
    Hourly,
    /// Never rotate.
    Never,
}

impl From<FileRotation> for Rotation {
    fn from(rotation: FileRotation) -> Self {
        match rotation {
            FileRotation::Daily => Rotation::DAILY,
            FileRotation::Hourly => Rotation::HOURLY,
            FileRotation::Never => Rotation::NEVER,
        }
    }
}

/// Rolling file settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticsFile {
    /// File name prefix (`logtarget` gives `logtarget.2026-01-15.log`).
    #[serde(default = "default_file_prefix")]
    pub prefix: String,
    /// Rotation strategy.
    #[serde(default)]
    pub rotation: FileRotation,
    /// Number of rotated files to keep (0 = unlimited).
    #[serde(default)]
    pub max_files: usize,
}

fn default_file_prefix() -> String {
    "logtarget".to_string()
}

impl Default for DiagnosticsFile {
    fn default() -> Self {
        Self {
            prefix: default_file_prefix(),
            rotation: FileRotation::default(),
            max_files: 0,
        }
    }
}

/// Diagnostics configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    /// Base filter (e.g. `warn`, `debug`).
    #[serde(default = "default_level")]
    pub level: String,
    /// Output format.
    #[serde(default)]
    pub format: DiagnosticsFormat,
    /// Output destination.
    #[serde(default)]
    pub output: DiagnosticsOutput,
    /// File settings, used with [`DiagnosticsOutput::File`].
    #[serde(default)]
    pub file: DiagnosticsFile,
    /// Extra filter directives (e.g. `logtarget_appcenter=debug`).
    #[serde(default)]
    pub directives: Vec<String>,
    /// Whether to use ANSI colors.
    #[serde(default = "default_true")]
    pub ansi: bool,
}

fn default_level() -> String {
    "warn".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: DiagnosticsFormat::default(),
            output: DiagnosticsOutput::default(),
            file: DiagnosticsFile::default(),
            directives: Vec::new(),
            ansi: true,
        }
    }
}

impl DiagnosticsConfig {
    /// Create a config with the given base level.
    #[must_use]
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Default::default()
        }
    }

    /// Set the output format.
    #[must_use]
    pub fn with_format(mut self, format: DiagnosticsFormat) -> Self {
        self.format = format;
        self
    }

    /// Write to rolling files in `directory`.
    #[must_use]
    pub fn with_file_output(
        mut self,
        directory: impl Into<PathBuf>,
        prefix: impl Into<String>,
    ) -> Self {
        self.output = DiagnosticsOutput::File(directory.into());
        self.file.prefix = prefix.into();
        self.ansi = false;
        self
    }

    /// Add a filter directive.
    #[must_use]
    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.directives.push(directive.into());
        self
    }

    /// Disable ANSI colors.
    #[must_use]
    pub fn without_ansi(mut self) -> Self {
        self.ansi = false;
        self
    }

    /// Build the filter from the level and directives.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::ConfigError`] on invalid syntax.
    pub fn build_filter(&self) -> TelemetryResult<EnvFilter> {
        let mut filter = EnvFilter::try_new(&self.level)
            .map_err(|e| TelemetryError::ConfigError(e.to_string()))?;

        for directive in &self.directives {
            filter = filter.add_directive(directive.parse().map_err(
                |e: tracing_subscriber::filter::ParseError| {
                    TelemetryError::ConfigError(e.to_string())
                },
            )?);
        }

        Ok(filter)
    }

    /// Open the rolling file appender for `directory`, creating it.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the
    /// appender cannot open its file.
    pub fn file_appender(&self, directory: &Path) -> TelemetryResult<RollingFileAppender> {
        std::fs::create_dir_all(directory)?;

        let mut builder = RollingFileAppender::builder()
            .rotation(self.file.rotation.into())
            .filename_prefix(&self.file.prefix)
            .filename_suffix("log");
        if self.file.max_files > 0 {
            builder = builder.max_log_files(self.file.max_files);
        }
        builder.build(directory).map_err(init_err)
    }

    fn layer<W>(&self, writer: W) -> BoxedLayer
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        let layer = fmt::layer().with_writer(writer).with_ansi(self.ansi);
        match self.format {
            DiagnosticsFormat::Pretty => layer.pretty().boxed(),
            DiagnosticsFormat::Compact => layer.compact().boxed(),
            DiagnosticsFormat::Json => layer.json().boxed(),
        }
    }
}

/// Install the global diagnostics subscriber.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the log directory
/// cannot be prepared, or a global subscriber is already installed.
pub fn setup_diagnostics(config: &DiagnosticsConfig) -> TelemetryResult<()> {
    let filter = config.build_filter()?;

    let layer = match &config.output {
        DiagnosticsOutput::Stdout => config.layer(std::io::stdout),
        DiagnosticsOutput::Stderr => config.layer(std::io::stderr),
        DiagnosticsOutput::File(directory) => config.layer(config.file_appender(directory)?),
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()
        .map_err(init_err)?;

    tracing::debug!(
        level = %config.level,
        format = ?config.format,
        output = ?config.output,
        "Diagnostics initialized"
    );
    Ok(())
}

/// Install the default diagnostics subscriber (`warn`, stderr, compact).
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn setup_default_diagnostics() -> TelemetryResult<()> {
    setup_diagnostics(&DiagnosticsConfig::default())
}
