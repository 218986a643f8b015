use clap::Parser;
use error_stack::{Result, ResultExt};
use std::net::IpAddr;
use std::num::NonZeroUsize;
use yatube::{config::Server as Config, http::server::StartServerError, App};

/// Expose the yatube HTTP server
#[derive(Debug, Parser)]
pub struct ServerCommand {
    #[clap(long)]
    pub address: Option<IpAddr>,
    #[clap(long)]
    pub port: Option<u16>,
    #[clap(long)]
    pub workers: Option<NonZeroUsize>,
}

pub fn run(args: ServerCommand) -> Result<(), StartServerError> {
    let mut config = Config::load().change_context(StartServerError)?;
    args.override_config(&mut config);

    yatube::telemetry::init(&config.logging).change_context(StartServerError)?;
    actix_web::rt::System::new().block_on(async move {
        let app = App::new(config).await.change_context(StartServerError)?;
        yatube::http::server::run(app).await
    })
}

impl ServerCommand {
    fn override_config(&self, config: &mut Config) {
        // override server configurations if set by the cli
        if let Some(address) = self.address {
            config.ip = address;
        }

        if let Some(port) = self.port {
            config.port = port;
        }

        if let Some(workers) = self.workers {
            config.workers = workers;
        }
    }
}
