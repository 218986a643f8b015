//! Where uploaded post images live.
use async_trait::async_trait;
use bytes::Bytes;
use error_stack::Result;
use std::fmt::Debug;
use thiserror::Error;

mod fs;
mod image;
mod memory;

pub use fs::FsStorage;
pub use image::{sanitize_file_name, store_image, ImageKind, IMAGE_DIR};
pub use memory::MemoryStorage;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid file name")]
    InvalidName,
    #[error("file already exists")]
    AlreadyExists,
    #[error("could not access stored file")]
    Io,
}

/// A flat namespace of files addressed by relative names
/// such as `posts/small.gif`.
#[async_trait]
pub trait Storage: Debug + Send + Sync {
    async fn exists(&self, name: &str) -> Result<bool, StorageError>;

    /// Writes `content` under `name`. Fails with
    /// [`StorageError::AlreadyExists`] if `name` is already taken,
    /// so two writers can never claim the same name.
    async fn create_new(&self, name: &str, content: Bytes) -> Result<(), StorageError>;

    /// Returns `None` if nothing is stored under `name`.
    async fn open(&self, name: &str) -> Result<Option<Bytes>, StorageError>;
}

/// Accepts only plain relative names without `..` segments.
pub(crate) fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('/')
        && !name.contains('\\')
        && name
            .split('/')
            .all(|segment| !segment.is_empty() && segment != "." && segment != "..")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_name() {
        assert!(is_valid_name("posts/small.gif"));
        assert!(is_valid_name("small.gif"));

        assert!(!is_valid_name(""));
        assert!(!is_valid_name("/etc/passwd"));
        assert!(!is_valid_name("posts/../../secret"));
        assert!(!is_valid_name("posts//a.gif"));
        assert!(!is_valid_name("posts\\a.gif"));
    }
}
