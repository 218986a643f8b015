use async_trait::async_trait;
use bytes::Bytes;
use error_stack::{Report, Result, ResultExt};
use std::{io::ErrorKind, path::PathBuf};
use tokio::{fs::OpenOptions, io::AsyncWriteExt};

use super::{is_valid_name, Storage, StorageError};

/// [`Storage`] rooted at a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path(&self, name: &str) -> Result<PathBuf, StorageError> {
        if is_valid_name(name) {
            Ok(self.root.join(name))
        } else {
            Err(Report::new(StorageError::InvalidName)).attach_printable_lazy(|| name.to_string())
        }
    }
}

#[async_trait]
impl Storage for FsStorage {
    #[tracing::instrument(skip(self), name = "storage.exists")]
    async fn exists(&self, name: &str) -> Result<bool, StorageError> {
        let path = self.path(name)?;
        tokio::fs::try_exists(&path)
            .await
            .change_context(StorageError::Io)
            .attach_printable_lazy(|| path.display().to_string())
    }

    #[tracing::instrument(skip(self, content), name = "storage.create_new")]
    async fn create_new(&self, name: &str, content: Bytes) -> Result<(), StorageError> {
        let path = self.path(name)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .change_context(StorageError::Io)
                .attach_printable_lazy(|| parent.display().to_string())?;
        }

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(Report::new(StorageError::AlreadyExists))
                    .attach_printable_lazy(|| path.display().to_string());
            }
            Err(e) => {
                return Err(e)
                    .change_context(StorageError::Io)
                    .attach_printable_lazy(|| path.display().to_string());
            }
        };

        let written = match file.write_all(&content).await {
            Ok(()) => file.flush().await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            // a half written file would keep the name taken forever
            drop(file);
            tokio::fs::remove_file(&path).await.ok();
            return Err(e)
                .change_context(StorageError::Io)
                .attach_printable_lazy(|| path.display().to_string());
        }
        Ok(())
    }

    #[tracing::instrument(skip(self), name = "storage.open")]
    async fn open(&self, name: &str) -> Result<Option<Bytes>, StorageError> {
        let path = self.path(name)?;
        match tokio::fs::read(&path).await {
            Ok(content) => Ok(Some(Bytes::from(content))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e)
                .change_context(StorageError::Io)
                .attach_printable_lazy(|| path.display().to_string()),
        }
    }
}
