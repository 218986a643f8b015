use async_trait::async_trait;
use bytes::Bytes;
use error_stack::{Report, Result};
use std::{
    collections::{hash_map::Entry, HashMap},
    sync::Arc,
};
use tokio::sync::RwLock;

use super::{is_valid_name, Storage, StorageError};

/// [`Storage`] that keeps every file in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    files: Arc<RwLock<HashMap<String, Bytes>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn check(name: &str) -> Result<(), StorageError> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(Report::new(StorageError::InvalidName))
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn exists(&self, name: &str) -> Result<bool, StorageError> {
        check(name)?;
        Ok(self.files.read().await.contains_key(name))
    }

    async fn create_new(&self, name: &str, content: Bytes) -> Result<(), StorageError> {
        check(name)?;
        match self.files.write().await.entry(name.to_string()) {
            Entry::Occupied(..) => Err(Report::new(StorageError::AlreadyExists)),
            Entry::Vacant(entry) => {
                entry.insert(content);
                Ok(())
            }
        }
    }

    async fn open(&self, name: &str) -> Result<Option<Bytes>, StorageError> {
        check(name)?;
        Ok(self.files.read().await.get(name).cloned())
    }
}
