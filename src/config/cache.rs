use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct Cache {
    /// How long the rendered index page is served from memory.
    #[serde(default = "Cache::default_index_ttl_secs")]
    pub index_ttl_secs: u64,
    /// Upper bound of cached index page variants.
    #[serde(default = "Cache::default_max_entries")]
    pub max_entries: u64,
}

impl Default for Cache {
    fn default() -> Self {
        Self {
            index_ttl_secs: Self::default_index_ttl_secs(),
            max_entries: Self::default_max_entries(),
        }
    }
}

impl Cache {
    const fn default_index_ttl_secs() -> u64 {
        20
    }

    const fn default_max_entries() -> u64 {
        1000
    }

    #[must_use]
    pub fn index_ttl(&self) -> Duration {
        Duration::from_secs(self.index_ttl_secs)
    }
}
