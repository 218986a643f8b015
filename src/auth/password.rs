use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use error_stack::{Result, ResultExt};
use once_cell::sync::Lazy;
use thiserror::Error;

static CONTEXT: Lazy<Argon2<'static>> = Lazy::new(|| {
    Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        argon2::Params::DEFAULT,
    )
});

/// Prefix of password hashes nobody can sign in with.
pub const UNUSABLE_PREFIX: char = '!';

#[derive(Debug, Error)]
#[error("Failed to generate password hash")]
pub struct HashPasswordError;

pub fn hash(password: impl AsRef<[u8]>) -> Result<String, HashPasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = CONTEXT
        .hash_password(password.as_ref(), &salt)
        .change_context(HashPasswordError)?;

    Ok(password_hash.to_string())
}

#[derive(Debug, Error)]
#[error("Failed to verify password")]
pub struct VerifyPasswordError;

pub fn verify(password: &[u8], hash: &str) -> Result<bool, VerifyPasswordError> {
    if hash.starts_with(UNUSABLE_PREFIX) {
        return Ok(false);
    }

    let hash = PasswordHash::new(hash)
        .change_context(VerifyPasswordError)
        .attach_printable("could not parse password hash")?;

    match CONTEXT.verify_password(password, &hash) {
        Ok(..) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(error) => Err(error).change_context(VerifyPasswordError),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hashed = hash("correct horse").unwrap();
        assert!(hashed.starts_with("$argon2id$"));
        assert!(verify(b"correct horse", &hashed).unwrap());
        assert!(!verify(b"wrong horse", &hashed).unwrap());
    }

    #[test]
    fn test_unusable_and_malformed_hashes() {
        assert!(!verify(b"anything", "!").unwrap());
        assert!(verify(b"anything", "not a hash").is_err());
    }
}
