use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::error::AppError;

/// Filesystem storage for uploaded images and export artifacts.
#[derive(Clone, Debug)]
pub struct LocalStorage {
    upload_dir: PathBuf,
    export_dir: PathBuf,
}

impl LocalStorage {
    pub fn new(upload_dir: impl Into<PathBuf>, export_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            export_dir: export_dir.into(),
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn upload_path(&self, filename: &str) -> PathBuf {
        self.upload_dir.join(filename)
    }

    pub fn export_path(&self, filename: &str) -> PathBuf {
        self.export_dir.join(filename)
    }

    pub async fn ensure_dirs(&self) -> Result<(), AppError> {
        for dir in [&self.upload_dir, &self.export_dir] {
            fs::create_dir_all(dir).await.map_err(|e| {
                tracing::error!(dir = %dir.display(), error = %e, "Failed to create storage directory");
                AppError::Io(e)
            })?;
        }
        Ok(())
    }

    /// Writes a new upload. Never overwrites: an existing file with the same
    /// name is an error. A failed write leaves no file behind.
    pub async fn put_object(&self, filename: &str, data: &[u8]) -> Result<(), AppError> {
        let path = self.upload_path(filename);
        let file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| {
                tracing::error!(path = %path.display(), error = %e, "Upload write error");
                AppError::Io(e)
            })?;

        write_or_discard(&path, file, data).await
    }

    pub async fn delete_object(&self, filename: &str) -> Result<(), AppError> {
        fs::remove_file(self.upload_path(filename)).await?;
        Ok(())
    }

    /// Writes (or overwrites) an export artifact and returns where it landed.
    pub async fn write_export(&self, filename: &str, data: &[u8]) -> Result<PathBuf, AppError> {
        let path = self.export_path(filename);
        fs::write(&path, data).await.map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "Export write error");
            AppError::Io(e)
        })?;
        Ok(path)
    }
}

/// Writes `data` through `writer`; on failure the half-written file at `path` is removed.
async fn write_or_discard<W>(path: &Path, mut writer: W, data: &[u8]) -> Result<(), AppError>
where
    W: AsyncWrite + Unpin,
{
    let written: std::io::Result<()> = async {
        writer.write_all(data).await?;
        writer.flush().await
    }
    .await;
    drop(writer);

    if let Err(e) = written {
        tracing::error!(path = %path.display(), error = %e, "Upload write error");
        if let Err(rm) = fs::remove_file(path).await {
            tracing::warn!(path = %path.display(), error = %rm, "Failed to remove partial upload");
        }
        return Err(AppError::Io(e));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use super::*;

    /// Accepts nothing: every write fails as if the disk were full.
    struct FullDisk;

    impl AsyncWrite for FullDisk {
        fn poll_write(self: Pin<&mut Self>, _: &mut Context<'_>, _: &[u8]) -> Poll<io::Result<usize>> {
            Poll::Ready(Err(io::Error::other("no space left on device")))
        }

        fn poll_flush(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    fn storage(dir: &tempfile::TempDir) -> LocalStorage {
        LocalStorage::new(dir.path().join("uploads"), dir.path().join("exports"))
    }

    #[tokio::test]
    async fn put_object_writes_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);
        storage.ensure_dirs().await.unwrap();

        storage.put_object("a.png", b"pixels").await.unwrap();

        assert_eq!(std::fs::read(storage.upload_path("a.png")).unwrap(), b"pixels");
    }

    #[tokio::test]
    async fn put_object_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);
        storage.ensure_dirs().await.unwrap();

        storage.put_object("a.png", b"one").await.unwrap();
        assert!(storage.put_object("a.png", b"two").await.is_err());
        assert_eq!(std::fs::read(storage.upload_path("a.png")).unwrap(), b"one");
    }

    #[tokio::test]
    async fn failed_write_removes_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);
        storage.ensure_dirs().await.unwrap();
        let path = storage.upload_path("partial.png");
        std::fs::write(&path, b"half").unwrap();

        let result = write_or_discard(&path, FullDisk, b"pixels").await;

        assert!(matches!(result, Err(AppError::Io(_))));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn write_export_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);
        storage.ensure_dirs().await.unwrap();

        storage.write_export("1_annotations.json", b"[1]").await.unwrap();
        let path = storage.write_export("1_annotations.json", b"[2]").await.unwrap();

        assert_eq!(std::fs::read(path).unwrap(), b"[2]");
    }

    #[tokio::test]
    async fn deleting_missing_object_fails() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);
        storage.ensure_dirs().await.unwrap();

        assert!(matches!(storage.delete_object("nope.png").await, Err(AppError::Io(_))));
    }
}
