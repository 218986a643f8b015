use clap::Parser;
use error_stack::{Result, ResultExt};
use thiserror::Error;

mod group;
mod migrate;
mod server;

/// Command line options for yatube.
#[derive(Debug, Parser)]
#[command(about = "Utility suite for the yatube blog", version, author, long_about)]
pub struct Cli {
    #[clap(subcommand)]
    pub subcommand: Subcommand,
}

#[derive(Debug, Error)]
#[error("Command failed")]
pub struct CliError;

impl Cli {
    pub fn run(self) -> Result<(), CliError> {
        match self.subcommand {
            Subcommand::Server(args) => self::server::run(args).change_context(CliError),
            Subcommand::Migrate => self::migrate::run().change_context(CliError),
            Subcommand::Group(args) => self::group::run(args).change_context(CliError),
        }
    }
}

#[derive(Debug, Parser)]
pub enum Subcommand {
    /// Serve the yatube website
    Server(self::server::ServerCommand),
    /// Apply pending database migrations
    Migrate,
    /// Manage groups
    Group(self::group::GroupCommand),
}
