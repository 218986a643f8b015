use error_stack::{Report, Result, ResultExt};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::num::NonZeroUsize;
use validator::Validate;

use super::{Cache, Database, Logging, Media, ParseError, Session};
use crate::util::{figment::FigmentErrorAttachable, validator::IntoValidatorReport};

#[derive(Debug, Deserialize)]
pub struct Server {
    #[serde(default = "Server::default_ip")]
    pub ip: IpAddr,
    #[serde(default = "Server::default_port")]
    pub port: u16,
    #[serde(default = "Server::default_workers")]
    pub workers: NonZeroUsize,
    pub db: Database,
    pub session: Session,
    #[serde(default)]
    pub media: Media,
    #[serde(default)]
    pub cache: Cache,
    #[serde(default)]
    pub logging: Logging,
}

impl Server {
    pub fn load() -> Result<Self, ParseError> {
        dotenvy::dotenv().ok();

        let config = Self::figment()
            .extract::<Self>()
            .map_err(|e| Report::new(ParseError).attach_figment_error(e))?;

        config
            .db
            .validate()
            .into_validator_report()
            .change_context(ParseError)
            .attach_printable("in `db` section")?;

        config
            .session
            .validate()
            .into_validator_report()
            .change_context(ParseError)
            .attach_printable("in `session` section")?;

        Ok(config)
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        Self {
            ip: Self::default_ip(),
            port: 0,
            workers: NonZeroUsize::MIN,
            db: Database::for_tests(),
            session: Session::for_tests(),
            media: Media::default(),
            cache: Cache::default(),
            logging: Logging::default(),
        }
    }
}

impl Server {
    const DEFAULT_CONFIG_FILE: &'static str = "yatube.toml";

    fn default_ip() -> IpAddr {
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    }

    const fn default_port() -> u16 {
        8000
    }

    fn default_workers() -> NonZeroUsize {
        std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN)
    }

    /// Creates a default [`Figment`] object to load server
    /// configuration. This function is there for implementing
    /// [`Server::load`] and testing.
    ///
    /// [`Figment`]: figment::Figment
    pub(crate) fn figment() -> figment::Figment {
        use figment::{
            providers::{Env, Format, Toml},
            Figment,
        };

        Figment::new()
            .merge(Toml::file(Self::DEFAULT_CONFIG_FILE))
            .merge(Env::prefixed("YATUBE_").split("__"))
            // Environment variable aliases
            .merge(
                Env::raw()
                    .only(&["DATABASE_URL", "PORT"])
                    .map(|v| match v.as_str() {
                        "DATABASE_URL" => "db.url".into(),
                        _ => v.as_str().to_lowercase().into(),
                    }),
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use std::num::{NonZeroU32, NonZeroU64};

    #[test]
    fn env_aliases() {
        Jail::expect_with(|jail| {
            jail.set_env("DATABASE_URL", "postgres://localhost/yatube");
            jail.set_env("PORT", "9000");
            jail.set_env("YATUBE_SESSION__SECRET", "super secret key!");

            jail.set_env("YATUBE_DB__MIN_IDLE", "2");
            jail.set_env("YATUBE_DB__POOL_SIZE", "100");
            jail.set_env("YATUBE_DB__ENFORCE_TLS", "true");
            jail.set_env("YATUBE_DB__TIMEOUT_SECS", "3030");

            let config: Server = Server::figment().extract()?;
            assert_eq!(config.db.url.as_str(), "postgres://localhost/yatube");
            assert_eq!(config.port, 9000);
            assert_eq!(config.session.secret.as_str(), "super secret key!");
            assert_eq!(config.db.min_idle, NonZeroU32::new(2));
            assert_eq!(config.db.pool_size, NonZeroU32::new(100).unwrap());
            assert!(config.db.enforce_tls);
            assert_eq!(config.db.timeout_secs, NonZeroU64::new(3030).unwrap());

            Ok(())
        });
    }

    #[test]
    fn file_with_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "yatube.toml",
                r#"
                    [db]
                    url = "postgres://localhost/yatube"

                    [session]
                    secret = "super secret key!"

                    [logging]
                    style = "compact"
                "#,
            )?;

            let config: Server = Server::figment().extract()?;
            assert_eq!(config.ip, IpAddr::V4(Ipv4Addr::LOCALHOST));
            assert_eq!(config.port, 8000);
            assert_eq!(config.cache.index_ttl_secs, 20);
            assert_eq!(config.media.max_upload_bytes, 5 * 1024 * 1024);
            assert_eq!(config.session.max_age_secs, 60 * 60 * 24 * 14);
            assert_eq!(config.logging.style, super::super::LoggingStyle::Compact);
            assert!(!config.db.enforce_tls);

            Ok(())
        });
    }

    #[test]
    fn rejects_short_secret_and_bad_url() {
        Jail::expect_with(|jail| {
            jail.set_env("DATABASE_URL", "mysql://localhost/yatube");
            jail.set_env("YATUBE_SESSION__SECRET", "short");

            let error = Server::load().unwrap_err();
            assert!(format!("{error:?}").contains("db"));

            jail.set_env("DATABASE_URL", "postgres://localhost/yatube");
            let error = Server::load().unwrap_err();
            assert!(format!("{error:?}").contains("session"));

            Ok(())
        });
    }

    #[test]
    fn rejects_zero_workers() {
        Jail::expect_with(|jail| {
            jail.set_env("DATABASE_URL", "postgres://localhost/yatube");
            jail.set_env("YATUBE_SESSION__SECRET", "super secret key!");

            jail.set_env("YATUBE_WORKERS", "4");
            let config: Server = Server::figment().extract()?;
            assert_eq!(config.workers.get(), 4);

            jail.set_env("YATUBE_WORKERS", "0");
            assert!(Server::figment().extract::<Server>().is_err());
            assert!(Server::load().is_err());

            Ok(())
        });
    }
}
