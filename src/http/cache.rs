use actix_web::HttpRequest;
use moka::future::Cache;
use std::sync::Arc;

use super::Actor;
use crate::config;

/// Rendered pages kept around for a short while. Entries vary by
/// URL and by who is asking, since pages show the signed in user.
#[derive(Debug, Clone)]
pub struct PageCache {
    pages: Cache<String, Arc<str>>,
}

impl PageCache {
    #[must_use]
    pub fn new(cfg: &config::Cache) -> Self {
        let pages = Cache::builder()
            .time_to_live(cfg.index_ttl())
            .max_capacity(cfg.max_entries)
            .build();

        Self { pages }
    }

    #[must_use]
    pub fn key(req: &HttpRequest, actor: &Actor) -> String {
        let session = actor
            .user()
            .map_or_else(|| "anonymous".to_string(), |user| user.id.to_string());

        format!("{}|{session}", req.uri())
    }

    pub async fn get(&self, key: &str) -> Option<Arc<str>> {
        self.pages.get(key).await
    }

    pub async fn insert(&self, key: String, page: Arc<str>) {
        self.pages.insert(key, page).await;
    }
}
