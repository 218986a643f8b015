use thiserror::Error;

mod cache;
mod database;
mod logging;
mod media;
mod server;
mod session;

pub use cache::Cache;
pub use database::Database;
pub use logging::{Logging, LoggingStyle};
pub use media::Media;
pub use server::Server;
pub use session::Session;

#[derive(Debug, Error)]
#[error("Failed to load configuration")]
pub struct ParseError;
