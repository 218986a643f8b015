use chrono::Utc;
use error_stack::{Result, ResultExt};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::{config, types::id::UserId};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "yatube_session";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Claims {
    pub sub: UserId,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error)]
#[error("Failed to sign session token")]
pub struct IssueSessionError;

/// Signs and checks the session tokens stored in [`SESSION_COOKIE`].
#[derive(Clone)]
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    max_age: Duration,
}

impl std::fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKeys")
            .field("max_age", &self.max_age)
            .finish_non_exhaustive()
    }
}

impl SessionKeys {
    #[must_use]
    pub fn new(cfg: &config::Session) -> Self {
        let secret = cfg.secret.as_str().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            max_age: cfg.max_age(),
        }
    }

    #[must_use]
    pub const fn max_age(&self) -> Duration {
        self.max_age
    }

    #[tracing::instrument(skip(self), name = "session.issue")]
    pub fn issue(&self, user_id: UserId) -> Result<String, IssueSessionError> {
        let now = Utc::now().timestamp();
        let max_age = i64::try_from(self.max_age.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims {
            sub: user_id,
            iat: now,
            exp: now.saturating_add(max_age),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .change_context(IssueSessionError)
    }

    /// Returns the signed in user, or `None` if the token is
    /// malformed, tampered with or expired.
    #[tracing::instrument(skip_all, name = "session.verify")]
    pub fn verify(&self, token: &str) -> Option<UserId> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        match jsonwebtoken::decode::<Claims>(token, &self.decoding, &validation) {
            Ok(data) => Some(data.claims.sub),
            Err(error) => {
                tracing::debug!(%error, "rejected session token");
                None
            }
        }
    }
}
