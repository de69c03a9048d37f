//! Test harness helpers.

use std::path::PathBuf;

use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

/// Create a temporary directory for testing.
///
/// # Panics
///
/// Panics if the temporary directory cannot be created.
#[must_use]
pub fn test_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// Create a file within a temporary directory and return its path.
///
/// # Panics
///
/// Panics if the file cannot be written.
#[must_use]
pub fn test_file_in_dir(dir: &TempDir, name: &str, content: impl AsRef<[u8]>) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write file");
    path
}

/// A directory of crash attachment files.
#[derive(Debug)]
pub struct AttachmentDir {
    /// The backing temporary directory.
    pub dir: TempDir,
}

impl AttachmentDir {
    /// Create an empty attachment directory.
    #[must_use]
    pub fn new() -> Self {
        Self { dir: test_dir() }
    }

    /// Add a file.
    #[must_use]
    pub fn with_file(self, name: &str, content: impl AsRef<[u8]>) -> Self {
        let _ = test_file_in_dir(&self.dir, name, content);
        self
    }

    /// The directory path as a layout-ready string.
    #[must_use]
    pub fn path_string(&self) -> String {
        self.dir.path().to_string_lossy().into_owned()
    }
}

impl Default for AttachmentDir {
    fn default() -> Self {
        Self::new()
    }
}

/// Set up test logging with the given filter.
///
/// Safe to call from every test; only the first call installs a
/// subscriber.
pub fn setup_test_logging(filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_test_writer()
        .try_init();
}

/// Set up test logging at `warn`.
pub fn setup_test_logging_default() {
    setup_test_logging("warn");
}
