use serde::Deserialize;
use std::num::{NonZeroU32, NonZeroU64};
use validator::Validate;

use crate::util::Sensitive;

/// Configuration for connecting to the Postgres database.
#[derive(Debug, Deserialize, Validate)]
pub struct Database {
    /// Connection URL connecting to the Postgres database.
    ///
    /// **Environment variables**:
    /// - `YATUBE_DB__URL` or `DATABASE_URL`
    #[validate(custom(function = "validate_url"))]
    pub url: Sensitive<String>,
    /// Minimum idle database connections just to avoid wasting
    /// hardware resources from the database server.
    pub min_idle: Option<NonZeroU32>,
    /// Maximum amount of pool size that database can handle
    #[serde(default = "Database::default_pool_size")]
    pub pool_size: NonZeroU32,
    /// Forces all database connections are encrypted with TLS
    /// (if possible).
    #[serde(default)]
    pub enforce_tls: bool,
    /// How long this server can wait until its time limit where the
    /// database connection takes a while to acknowledge or
    /// successfully established.
    #[serde(default = "Database::default_pool_timeout_secs")]
    pub timeout_secs: NonZeroU64,
}

fn validate_url(url: &Sensitive<String>) -> Result<(), validator::ValidationError> {
    let url = url.as_str();
    if url.starts_with("postgres://") || url.starts_with("postgresql://") {
        Ok(())
    } else {
        let mut error = validator::ValidationError::new("url");
        error.message = Some("Invalid Postgres connection URL".into());
        Err(error)
    }
}

impl Database {
    const DEFAULT_POOL_SIZE: u32 = 5;
    const DEFAULT_POOL_TIMEOUT_SECS: u64 = 5;

    // Required by serde
    const fn default_pool_size() -> NonZeroU32 {
        match NonZeroU32::new(Self::DEFAULT_POOL_SIZE) {
            Some(n) => n,
            None => panic!("DEFAULT_POOL_SIZE is accidentally set to 0"),
        }
    }

    const fn default_pool_timeout_secs() -> NonZeroU64 {
        match NonZeroU64::new(Self::DEFAULT_POOL_TIMEOUT_SECS) {
            Some(n) => n,
            None => panic!("DEFAULT_POOL_TIMEOUT_SECS is accidentally set to 0"),
        }
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        Self {
            url: Sensitive::new("postgres://localhost/yatube_test".into()),
            min_idle: None,
            pool_size: Self::default_pool_size(),
            enforce_tls: false,
            timeout_secs: Self::default_pool_timeout_secs(),
        }
    }
}
