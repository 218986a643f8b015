#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]
pub mod app;
pub mod auth;
pub mod config;
pub mod database;
pub mod http;
pub mod schema;
pub mod storage;
pub mod telemetry;
pub mod types;
pub mod util;

pub use app::App;

pub(crate) mod internal;

#[cfg(test)]
pub(crate) mod test_utils;
