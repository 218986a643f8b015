use error_stack::{Result, ResultExt};
use std::{ops::Deref, sync::Arc};
use thiserror::Error;

use crate::{
    auth::SessionKeys,
    config,
    database::{self, Data, PgData},
    http::{cache::PageCache, render::Templates},
    storage::{FsStorage, Storage},
};

/// Shared state of every request handler.
#[derive(Debug, Clone)]
#[must_use]
pub struct App(Arc<AppInner>);

#[derive(Debug)]
pub struct AppInner {
    pub config: Arc<config::Server>,
    pub data: Arc<dyn Data>,
    pub storage: Arc<dyn Storage>,
    pub sessions: SessionKeys,
    pub pages: PageCache,
    pub templates: Templates,
}

#[derive(Debug, Error)]
#[error("Could not initialize server application")]
pub struct AppError;

impl App {
    #[tracing::instrument(skip_all, name = "app.new")]
    pub async fn new(config: config::Server) -> Result<Self, AppError> {
        let pool = database::Pool::new(&config.db)
            .await
            .change_context(AppError)
            .attach_printable("could not setup database pool")?;

        let storage = FsStorage::new(config.media.root.clone());
        Self::from_parts(config, Arc::new(PgData::new(pool)), Arc::new(storage))
    }

    /// Assembles an [`App`] out of already initialized backends.
    pub fn from_parts(
        config: config::Server,
        data: Arc<dyn Data>,
        storage: Arc<dyn Storage>,
    ) -> Result<Self, AppError> {
        let templates = Templates::new()
            .change_context(AppError)
            .attach_printable("could not load templates")?;

        Ok(Self(Arc::new(AppInner {
            sessions: SessionKeys::new(&config.session),
            pages: PageCache::new(&config.cache),
            config: Arc::new(config),
            data,
            storage,
            templates,
        })))
    }

    /// Creates a new [`App`] backed by in-memory data and storage.
    #[cfg(test)]
    pub fn new_for_tests() -> Self {
        use crate::{database::MemoryData, storage::MemoryStorage};

        crate::telemetry::init_for_tests();
        Self::from_parts(
            config::Server::for_tests(),
            Arc::new(MemoryData::new()),
            Arc::new(MemoryStorage::new()),
        )
        .expect("could not build test app")
    }
}

impl Deref for App {
    type Target = AppInner;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
