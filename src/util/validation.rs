use once_cell::sync::Lazy;
use regex::Regex;

#[allow(clippy::expect_used)]
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9-]+(?:\.[a-zA-Z0-9-]+)*$")
        .expect("compile email regex")
});

#[allow(clippy::expect_used)]
static USERNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w.-]+$").expect("compile username regex"));

#[allow(clippy::expect_used)]
static SLUG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("compile slug regex"));

pub const USERNAME_MAX: usize = 150;
pub const SLUG_MAX: usize = 50;
pub const PASSWORD_MIN: usize = 8;
pub const PASSWORD_MAX: usize = 128;

/// First path segments that are taken by fixed routes, so
/// a profile under that name would never be reachable.
pub const RESERVED_USERNAMES: &[&str] = &["about", "auth", "follow", "group", "media", "new"];

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email) && email.len() <= 254
}

pub fn is_valid_username(name: &str) -> bool {
    USERNAME_REGEX.is_match(name)
        && name.chars().count() <= USERNAME_MAX
        && !RESERVED_USERNAMES.contains(&name)
}

pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_REGEX.is_match(slug) && slug.len() <= SLUG_MAX
}

pub fn is_valid_password(pass: &str) -> bool {
    let len = pass.chars().count();
    (PASSWORD_MIN..=PASSWORD_MAX).contains(&len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("gush@gmail.com"));
        assert!(!is_valid_email("nada_neutho"));
    }

    #[test]
    fn test_is_valid_username() {
        assert!(is_valid_username("Mark"));
        assert!(is_valid_username("mark.robes"));
        assert!(is_valid_username("salmon-ella"));
        assert!(is_valid_username("leo_tolstoy"));
        assert!(is_valid_username("Николай"));

        assert!(!is_valid_username("pretty ugly"));
        assert!(!is_valid_username("leo+tolstoy"));
        assert!(!is_valid_username("leo@ya"));
        assert!(!is_valid_username(""));
        assert!(!is_valid_username("new"));
        assert!(!is_valid_username("follow"));
        assert!(!is_valid_username(&"a".repeat(151)));
    }

    #[test]
    fn test_is_valid_slug() {
        assert!(is_valid_slug("test-slug"));
        assert!(is_valid_slug("cats_2"));
        assert!(!is_valid_slug("with space"));
        assert!(!is_valid_slug(""));
    }

    #[test]
    fn test_is_valid_password() {
        assert!(is_valid_password("correct horse"));
        assert!(!is_valid_password("short"));
    }
}
