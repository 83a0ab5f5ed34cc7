//! Download sinks: where an exported PDF ends up.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::Config;
use crate::export::{ExportError, ExportedPdf};

/// Give up looking for a free filename after this many suffixes.
const MAX_NAME_ATTEMPTS: u32 = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedExport {
    /// Path or key the file was stored under.
    pub location: String,
    pub size: usize,
}

#[async_trait]
pub trait DownloadSink: Send + Sync {
    async fn deliver(&self, file: &ExportedPdf) -> Result<SavedExport, ExportError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Directory
// ────────────────────────────────────────────────────────────────────────────

/// Writes into a directory. Existing files are never overwritten; a second
/// `Jane_Doe_Resume.pdf` lands as `Jane_Doe_Resume (1).pdf`.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.export_dir.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn candidate_name(filename: &str, attempt: u32) -> String {
    if attempt == 0 {
        return filename.to_string();
    }
    match filename.rsplit_once('.') {
        Some((stem, ext)) => format!("{stem} ({attempt}).{ext}"),
        None => format!("{filename} ({attempt})"),
    }
}

/// Writes `bytes` to the freshly created `path`. On failure the partial file is
/// removed so a truncated PDF never sits under the real name.
async fn write_or_discard<W>(mut handle: W, path: &Path, bytes: &[u8]) -> Result<(), ExportError>
where
    W: AsyncWrite + Unpin,
{
    let written = match handle.write_all(bytes).await {
        Ok(()) => handle.flush().await,
        Err(e) => Err(e),
    };
    drop(handle);

    if let Err(e) = written {
        warn!("Write to {} failed, removing partial file: {e}", path.display());
        if let Err(cleanup) = tokio::fs::remove_file(path).await {
            warn!("Could not remove {}: {cleanup}", path.display());
        }
        return Err(e.into());
    }
    Ok(())
}

#[async_trait]
impl DownloadSink for DirectorySink {
    async fn deliver(&self, file: &ExportedPdf) -> Result<SavedExport, ExportError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let path = self.dir.join(candidate_name(&file.filename, attempt));
            let handle = match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(handle) => handle,
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };

            write_or_discard(handle, &path, &file.bytes).await?;

            info!("Saved export to {}", path.display());
            return Ok(SavedExport {
                location: path.display().to_string(),
                size: file.bytes.len(),
            });
        }

        Err(ExportError::Io(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("no free filename for {} in {}", file.filename, self.dir.display()),
        )))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Memory
// ────────────────────────────────────────────────────────────────────────────

/// Keeps delivered files in memory, in delivery order.
#[derive(Debug, Default)]
pub struct MemorySink {
    files: Mutex<Vec<(String, Bytes)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn files(&self) -> Vec<(String, Bytes)> {
        self.files.lock().await.clone()
    }
}

#[async_trait]
impl DownloadSink for MemorySink {
    async fn deliver(&self, file: &ExportedPdf) -> Result<SavedExport, ExportError> {
        let mut files = self.files.lock().await;
        files.push((file.filename.clone(), file.bytes.clone()));
        Ok(SavedExport {
            location: format!("memory://{}/{}", files.len() - 1, file.filename),
            size: file.bytes.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn pdf(name: &str, body: &'static [u8]) -> ExportedPdf {
        ExportedPdf {
            filename: name.into(),
            bytes: Bytes::from_static(body),
            pages: 1,
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn test_candidate_names() {
        assert_eq!(candidate_name("a.pdf", 0), "a.pdf");
        assert_eq!(candidate_name("a.pdf", 2), "a (2).pdf");
        assert_eq!(candidate_name("noext", 1), "noext (1)");
    }

    #[tokio::test]
    async fn test_directory_sink_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path().join("exports"));

        let first = sink.deliver(&pdf("Jane_Doe_Resume.pdf", b"%PDF-first")).await.unwrap();
        let second = sink.deliver(&pdf("Jane_Doe_Resume.pdf", b"%PDF-second")).await.unwrap();

        assert!(first.location.ends_with("Jane_Doe_Resume.pdf"));
        assert!(second.location.ends_with("Jane_Doe_Resume (1).pdf"));
        assert_eq!(std::fs::read(&first.location).unwrap(), b"%PDF-first");
        assert_eq!(std::fs::read(&second.location).unwrap(), b"%PDF-second");
        assert_eq!(second.size, 11);
    }

    /// Accepts nothing; every write fails like a full disk.
    struct FullDisk;

    impl AsyncWrite for FullDisk {
        fn poll_write(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
            _buf: &[u8],
        ) -> std::task::Poll<std::io::Result<usize>> {
            std::task::Poll::Ready(Err(std::io::Error::new(
                std::io::ErrorKind::Other,
                "no space left on device",
            )))
        }

        fn poll_flush(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            std::task::Poll::Ready(Ok(()))
        }

        fn poll_shutdown(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            std::task::Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn test_failed_write_leaves_no_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Jane_Doe_Resume.pdf");
        std::fs::write(&path, b"").unwrap();

        let result = write_or_discard(FullDisk, &path, b"%PDF-1.3 ...").await;

        assert!(matches!(result, Err(ExportError::Io(_))));
        assert!(!path.exists());

        // The retry then gets the real name, not a "(1)" suffix.
        let saved = DirectorySink::new(dir.path())
            .deliver(&pdf("Jane_Doe_Resume.pdf", b"%PDF-retry"))
            .await
            .unwrap();
        assert!(saved.location.ends_with("Jane_Doe_Resume.pdf"));
    }

    #[tokio::test]
    async fn test_memory_sink_collects_files() {
        let sink = MemorySink::new();
        sink.deliver(&pdf("resume.pdf", b"%PDF-1")).await.unwrap();
        sink.deliver(&pdf("resume.pdf", b"%PDF-2")).await.unwrap();

        let files = sink.files().await;
        assert_eq!(files.len(), 2);
        assert_eq!(files[1].1, Bytes::from_static(b"%PDF-2"));
    }
}
