//! Core error types.

use thiserror::Error;

/// Errors raised by the core logging plumbing.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A layout template could not be parsed.
    #[error("invalid layout '{layout}': {message}")]
    LayoutParse {
        /// The offending layout text.
        layout: String,
        /// What went wrong.
        message: String,
    },

    /// A key was added twice to a dictionary.
    #[error("an item with the same key has already been added: {0}")]
    DuplicateKey(String),

    /// No factory is registered for the requested target type.
    #[error("unknown target type: {0}")]
    UnknownTargetType(String),

    /// Configuration is structurally valid but semantically wrong.
    #[error("configuration error: {0}")]
    Config(String),

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// A target failed to initialize or write.
    #[error("target '{target}' failed: {source}")]
    Target {
        /// Name of the failing target.
        target: String,
        /// Underlying failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl CoreError {
    /// Wrap a target-specific error.
    pub fn target(
        target: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Target {
            target: target.into(),
            source: Box::new(source),
        }
    }
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
