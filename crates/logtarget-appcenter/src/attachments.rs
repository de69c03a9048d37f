//! Crash attachments built from the files of a directory.
//!
//! Only the immediate entries of the directory are considered. Each
//! regular, non-hidden file small enough to upload is gzip-compressed in
//! memory and attached as `<name>.gz`. The backend enforces its own caps;
//! filtering here avoids compressing files it would reject anyway.

use std::fs::{self, File, Metadata};
use std::io;
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;
use tracing::{debug, error};

use crate::error::{AppCenterError, AppCenterResult};
use crate::sdk::{ATTACHMENT_CONTENT_TYPE, ErrorAttachment};

/// Maximum number of attachments per crash report.
pub const MAX_ATTACHMENT_COUNT: usize = 10;

/// Files larger than this (10 MiB) are not compressed at all.
pub const MAX_UNCOMPRESSED_SIZE: u64 = 10_485_760;

/// Compressed payloads larger than this (1 MiB) are dropped.
pub const MAX_COMPRESSED_SIZE: u64 = 1_048_576;

/// Size and count limits applied while building attachments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachmentLimits {
    /// Maximum number of attachments returned.
    pub max_count: usize,
    /// Largest file size, in bytes, that is still compressed.
    pub max_uncompressed_size: u64,
    /// Largest compressed size, in bytes, that is still attached.
    pub max_compressed_size: u64,
}

impl Default for AttachmentLimits {
    fn default() -> Self {
        Self {
            max_count: MAX_ATTACHMENT_COUNT,
            max_uncompressed_size: MAX_UNCOMPRESSED_SIZE,
            max_compressed_size: MAX_COMPRESSED_SIZE,
        }
    }
}

impl AttachmentLimits {
    /// Whether a file of `size` bytes is worth compressing.
    #[must_use]
    pub fn accepts_uncompressed(&self, size: u64) -> bool {
        size <= self.max_uncompressed_size
    }

    /// Whether a compressed payload of `size` bytes can be attached.
    #[must_use]
    pub fn accepts_compressed(&self, size: u64) -> bool {
        size <= self.max_compressed_size
    }
}

/// Builds gzip crash attachments from a directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttachmentBuilder {
    limits: AttachmentLimits,
}

impl AttachmentBuilder {
    /// Create a builder with the backend's default limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with custom limits.
    #[must_use]
    pub fn with_limits(limits: AttachmentLimits) -> Self {
        Self { limits }
    }

    /// The limits in effect.
    #[must_use]
    pub fn limits(&self) -> AttachmentLimits {
        self.limits
    }

    /// Build attachments from the files directly inside `directory`.
    ///
    /// Files are visited in name order. Hidden files, non-files and files
    /// outside the size limits are skipped; at most `max_count`
    /// attachments are returned.
    ///
    /// # Errors
    ///
    /// Any I/O failure aborts the whole build and is returned as
    /// [`AppCenterError::Attachment`] after being logged.
    pub fn build(&self, directory: &Path) -> AppCenterResult<Vec<ErrorAttachment>> {
        let result = self.try_build(directory);
        if let Err(e) = &result {
            error!(path = %directory.display(), error = %e, "Failed to build crash attachments");
        }
        result
    }

    fn try_build(&self, directory: &Path) -> AppCenterResult<Vec<ErrorAttachment>> {
        let mut paths = fs::read_dir(directory)
            .and_then(|entries| {
                entries
                    .map(|entry| entry.map(|e| e.path()))
                    .collect::<io::Result<Vec<PathBuf>>>()
            })
            .map_err(attachment_error(directory))?;
        paths.sort();

        let mut attachments = Vec::new();
        for path in paths {
            if attachments.len() >= self.limits.max_count {
                debug!(
                    path = %directory.display(),
                    max_count = self.limits.max_count,
                    "Attachment limit reached, ignoring remaining files"
                );
                break;
            }

            if is_dot_file(&path) {
                continue;
            }
            let metadata = fs::metadata(&path).map_err(attachment_error(&path))?;
            if !metadata.is_file() || has_hidden_attribute(&metadata) {
                continue;
            }
            if !self.limits.accepts_uncompressed(metadata.len()) {
                debug!(path = %path.display(), size = metadata.len(), "Skipping oversized file");
                continue;
            }

            let data = compress_file(&path).map_err(attachment_error(&path))?;
            let compressed_size = u64::try_from(data.len()).unwrap_or(u64::MAX);
            if !self.limits.accepts_compressed(compressed_size) {
                debug!(
                    path = %path.display(),
                    compressed_size,
                    "Skipping file whose compressed size exceeds the limit"
                );
                continue;
            }

            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            attachments.push(ErrorAttachment::new(
                data,
                format!("{file_name}.gz"),
                ATTACHMENT_CONTENT_TYPE,
            ));
        }

        Ok(attachments)
    }
}

fn attachment_error(path: &Path) -> impl FnOnce(io::Error) -> AppCenterError + '_ {
    move |source| AppCenterError::Attachment {
        path: path.to_path_buf(),
        source,
    }
}

fn compress_file(path: &Path) -> io::Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    io::copy(&mut file, &mut encoder)?;
    encoder.finish()
}

fn is_dot_file(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with('.'))
}

#[cfg(windows)]
fn has_hidden_attribute(metadata: &Metadata) -> bool {
    use std::os::windows::fs::MetadataExt;

    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
    metadata.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0
}

#[cfg(not(windows))]
fn has_hidden_attribute(_metadata: &Metadata) -> bool {
    false
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use std::io::Read;

    use flate2::read::GzDecoder;

    use super::*;

    /// Bytes that gzip cannot shrink.
    fn noise(len: usize) -> Vec<u8> {
        let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
        (0..len)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                state.to_le_bytes()[0]
            })
            .collect()
    }

    fn names(attachments: &[ErrorAttachment]) -> Vec<&str> {
        attachments.iter().map(|a| a.file_name.as_str()).collect()
    }

    #[test]
    fn test_compresses_files_with_gz_suffix() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("app.log"), "line one\nline two\n").unwrap();

        let attachments = AttachmentBuilder::new().build(dir.path()).unwrap();
        assert_eq!(names(&attachments), vec!["app.log.gz"]);
        assert_eq!(attachments[0].content_type, "application/x-zip-compressed");

        let mut decoded = String::new();
        GzDecoder::new(attachments[0].data.as_slice())
            .read_to_string(&mut decoded)
            .unwrap();
        assert_eq!(decoded, "line one\nline two\n");
    }

    #[test]
    fn test_skips_hidden_files_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".secret"), "x").unwrap();
        fs::write(dir.path().join("visible.txt"), "x").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("inner.txt"), "x").unwrap();

        let attachments = AttachmentBuilder::new().build(dir.path()).unwrap();
        assert_eq!(names(&attachments), vec!["visible.txt.gz"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_hidden_symlink_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("app.log"), "x").unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join(".lock")).unwrap();

        let attachments = AttachmentBuilder::new().build(dir.path()).unwrap();
        assert_eq!(names(&attachments), vec!["app.log.gz"]);
    }

    #[test]
    fn test_caps_attachment_count() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..12 {
            fs::write(dir.path().join(format!("file{i:02}.log")), format!("entry {i}")).unwrap();
        }

        let attachments = AttachmentBuilder::new().build(dir.path()).unwrap();
        assert_eq!(attachments.len(), MAX_ATTACHMENT_COUNT);
        assert_eq!(attachments[0].file_name, "file00.log.gz");
        assert_eq!(attachments[9].file_name, "file09.log.gz");
    }

    #[test]
    fn test_skips_file_over_uncompressed_limit() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("huge.bin"), vec![0u8; 11 * 1024 * 1024]).unwrap();
        fs::write(dir.path().join("small.log"), "ok").unwrap();

        let attachments = AttachmentBuilder::new().build(dir.path()).unwrap();
        assert_eq!(names(&attachments), vec!["small.log.gz"]);
    }

    #[test]
    fn test_skips_file_over_compressed_limit() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("noise.bin"), noise(2 * 1024 * 1024)).unwrap();
        fs::write(dir.path().join("zeros.bin"), vec![0u8; 4 * 1024 * 1024]).unwrap();

        let attachments = AttachmentBuilder::new().build(dir.path()).unwrap();
        assert_eq!(names(&attachments), vec!["zeros.bin.gz"]);
        assert!(attachments[0].data.len() as u64 <= MAX_COMPRESSED_SIZE);
    }

    #[test]
    fn test_limit_boundaries() {
        let limits = AttachmentLimits::default();
        assert!(limits.accepts_compressed(MAX_COMPRESSED_SIZE));
        assert!(!limits.accepts_compressed(MAX_COMPRESSED_SIZE + 1));
        assert!(limits.accepts_uncompressed(MAX_UNCOMPRESSED_SIZE));
        assert!(!limits.accepts_uncompressed(11 * 1024 * 1024));
    }

    #[test]
    fn test_compressed_limit_is_inclusive() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("noise.bin"), noise(4096)).unwrap();
        let gz_len = compress_file(&dir.path().join("noise.bin")).unwrap().len() as u64;

        let at_limit = AttachmentBuilder::with_limits(AttachmentLimits {
            max_compressed_size: gz_len,
            ..AttachmentLimits::default()
        });
        assert_eq!(names(&at_limit.build(dir.path()).unwrap()), vec!["noise.bin.gz"]);

        let one_over = AttachmentBuilder::with_limits(AttachmentLimits {
            max_compressed_size: gz_len - 1,
            ..AttachmentLimits::default()
        });
        assert!(one_over.build(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_custom_limits() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.log"), "a").unwrap();
        fs::write(dir.path().join("b.log"), "b").unwrap();
        fs::write(dir.path().join("c.log"), "c").unwrap();

        let builder = AttachmentBuilder::with_limits(AttachmentLimits {
            max_count: 2,
            ..AttachmentLimits::default()
        });
        assert_eq!(names(&builder.build(dir.path()).unwrap()), vec!["a.log.gz", "b.log.gz"]);
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AttachmentBuilder::new().build(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");

        let err = AttachmentBuilder::new().build(&missing).unwrap_err();
        assert!(matches!(
            err,
            AppCenterError::Attachment { ref path, .. } if *path == missing
        ));
    }
}
