use serde::Deserialize;
use std::time::Duration;
use validator::Validate;

use crate::util::Sensitive;

#[derive(Debug, Deserialize, Validate)]
pub struct Session {
    /// Key used to sign session tokens.
    ///
    /// **Environment variables**:
    /// - `YATUBE_SESSION__SECRET`
    #[validate(custom(function = "validate_secret"))]
    pub secret: Sensitive<String>,
    /// How long a session stays valid after signing in.
    #[serde(default = "Session::default_max_age_secs")]
    pub max_age_secs: u64,
}

fn validate_secret(secret: &Sensitive<String>) -> Result<(), validator::ValidationError> {
    if (12..=1024).contains(&secret.as_str().len()) {
        Ok(())
    } else {
        let mut error = validator::ValidationError::new("length");
        error.message = Some("Invalid session secret key".into());
        Err(error)
    }
}

impl Session {
    // Two weeks, same as the usual session cookie age.
    const DEFAULT_MAX_AGE_SECS: u64 = 60 * 60 * 24 * 14;

    const fn default_max_age_secs() -> u64 {
        Self::DEFAULT_MAX_AGE_SECS
    }

    #[must_use]
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_secs)
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        Self {
            secret: Sensitive::new("a very secret testing key".into()),
            max_age_secs: Self::DEFAULT_MAX_AGE_SECS,
        }
    }
}
