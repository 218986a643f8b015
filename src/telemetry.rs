use error_stack::{Result, ResultExt};
use std::io;
use thiserror::Error;
use tracing::{level_filters::LevelFilter, warn};
use tracing_error::ErrorLayer;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Layer};

use crate::config::{Logging, LoggingStyle};

#[derive(Debug, Error)]
#[error("Failed to initialize tracing")]
pub struct TracingInitError;

pub fn init(config: &Logging) -> Result<(), TracingInitError> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let targets = config
        .targets
        .as_deref()
        .or(rust_log.as_deref())
        .unwrap_or_default();

    let console = tracing_subscriber::fmt::layer().with_writer(io::stderr);
    let console = match config.style {
        LoggingStyle::Compact => console.compact().boxed(),
        LoggingStyle::Full => console.boxed(),
        LoggingStyle::Pretty => console.pretty().boxed(),
    };

    let registry = tracing_subscriber::registry()
        .with(console.with_filter(make_env_filter(targets)))
        .with(ErrorLayer::default());

    tracing::subscriber::set_global_default(registry)
        .change_context(TracingInitError)
        .attach_printable("already initialized tracing")?;

    if config.targets.is_some() && rust_log.is_some() {
        warn!("Both `RUST_LOG` and `logging.targets` are set, `logging.targets` takes precedence");
    }

    Ok(())
}

/// Routes logs into the test harness output. Calling it more than
/// once is harmless.
pub fn init_for_tests() {
    let console = tracing_subscriber::fmt::layer()
        .with_test_writer()
        .with_filter(make_env_filter(
            &std::env::var("RUST_LOG").unwrap_or_default(),
        ));

    let registry = tracing_subscriber::registry()
        .with(console)
        .with(ErrorLayer::default());

    tracing::subscriber::set_global_default(registry).ok();
}

fn make_env_filter(targets: &str) -> EnvFilter {
    let default_level = if cfg!(debug_assertions) {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    EnvFilter::builder()
        .with_default_directive(default_level.into())
        .parse_lossy(targets)
}
