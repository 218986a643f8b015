use error_stack::{Report, Result, ResultExt};
use thiserror::Error;
use yatube::{config::Server as Config, database::Pool};

#[derive(Debug, Error)]
#[error("Failed to migrate database")]
pub struct MigrateError;

pub fn run() -> Result<(), MigrateError> {
    let config = Config::load().change_context(MigrateError)?;
    yatube::telemetry::init(&config.logging).change_context(MigrateError)?;

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .change_context(MigrateError)
        .attach_printable("could not build tokio runtime")?
        .block_on(async {
            let pool = Pool::new(&config.db).await.change_context(MigrateError)?;
            pool.wait_until_healthy()
                .await
                .change_context(MigrateError)
                .attach_printable("database is not reachable")?;

            pool.migrate().await.change_context(MigrateError)?;
            tracing::info!("database is up to date");
            Ok::<_, Report<MigrateError>>(())
        })
}
