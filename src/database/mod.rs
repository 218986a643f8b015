use error_stack::{Report, ResultExt};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use std::{str::FromStr, time::Duration};

use crate::config;

mod data;
mod error;
mod memory;
mod postgres;

pub use data::Data;
pub use error::*;
pub use memory::MemoryData;
pub use postgres::PgData;

pub type PoolConnection = sqlx::pool::PoolConnection<sqlx::Postgres>;
pub type Connection = sqlx::PgConnection;

#[derive(Clone)]
pub struct Pool {
    pool: sqlx::PgPool,
}

impl Pool {
    /// Creates a lazily connected pool. An unreachable database
    /// is not an error here, requests will fail until it is back.
    #[tracing::instrument(skip_all, name = "db.pool.new")]
    pub async fn new(cfg: &config::Database) -> Result<Self> {
        let mut pool_opts = PgPoolOptions::new()
            .acquire_timeout(Duration::from_secs(cfg.timeout_secs.get()))
            .max_connections(cfg.pool_size.get());

        if let Some(min_idle) = cfg.min_idle {
            pool_opts = pool_opts.min_connections(min_idle.get());
        }

        let mut connect_opts =
            PgConnectOptions::from_str(cfg.url.as_str()).change_context(Error::InvalidUrl)?;

        if cfg.enforce_tls {
            connect_opts = connect_opts.ssl_mode(PgSslMode::Prefer);
        }

        let pool = Self {
            pool: pool_opts.connect_lazy_with(connect_opts),
        };

        match pool.wait_until_healthy().await {
            Ok(..) => {}
            Err(err) if err.is_unhealthy() => {
                tracing::warn!("database is not reachable yet");
            }
            Err(err) => return Err(err),
        }

        Ok(pool)
    }
}

impl std::fmt::Debug for Pool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.pool.fmt(f)
    }
}

impl Pool {
    #[inline(always)]
    pub fn connections(&self) -> u32 {
        self.pool.size()
    }

    #[inline(always)]
    pub fn is_healthy(&self) -> bool {
        self.connections() > 0
    }

    #[tracing::instrument(name = "db.connect", skip(self))]
    pub async fn get(&self) -> Result<PoolConnection> {
        into_pool_error(self.pool.acquire().await)
    }

    #[tracing::instrument(skip(self))]
    pub async fn wait_until_healthy(&self) -> Result<()> {
        match self.pool.acquire().await {
            Ok(..) => Ok(()),
            Err(e) if !self.is_healthy() => Err(e).change_context(Error::UnhealthyPool),
            Err(err) => Err(Report::new(Error::Internal(err))),
        }
    }

    /// Applies every bundled migration that has not run yet.
    #[tracing::instrument(skip(self), name = "db.migrate")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .change_context(Error::Migrate)
    }
}

/// Timing out while waiting for a connection means the database
/// cannot be reached.
fn into_pool_error<T>(result: std::result::Result<T, sqlx::Error>) -> Result<T> {
    match result {
        Err(e @ sqlx::Error::PoolTimedOut) => Err(e).change_context(Error::UnhealthyPool),
        other => other.into_db_error(),
    }
}
