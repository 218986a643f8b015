use serde::Serialize;
use std::borrow::Cow;
use validator::{Validate, ValidationError};

use super::FormErrors;
use crate::util::validation::{is_valid_email, is_valid_password, is_valid_username};
use crate::util::Sensitive;

pub const USERNAME_TAKEN_MESSAGE: &str = "A user with that username already exists.";
pub const PASSWORD_MISMATCH_MESSAGE: &str = "The two password fields didn't match.";
pub const INVALID_LOGIN_MESSAGE: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn validate_username(value: &str) -> Result<(), ValidationError> {
    if is_valid_username(value) {
        Ok(())
    } else {
        Err(error(
            "invalid_username",
            "Enter a valid username. This value may contain only letters, numbers, and ./-/_ characters.",
        ))
    }
}

fn validate_email(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || is_valid_email(value) {
        Ok(())
    } else {
        Err(error("invalid_email", "Enter a valid email address."))
    }
}

fn validate_password(value: &Sensitive<String>) -> Result<(), ValidationError> {
    if is_valid_password(value.as_str()) {
        Ok(())
    } else {
        Err(error(
            "invalid_password",
            "This password must contain between 8 and 128 characters.",
        ))
    }
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct SignupForm {
    #[validate(length(max = 150, message = "Ensure this value has at most 150 characters."))]
    pub first_name: String,
    #[validate(length(max = 150, message = "Ensure this value has at most 150 characters."))]
    pub last_name: String,
    #[validate(custom(function = "validate_username"))]
    pub username: String,
    #[validate(custom(function = "validate_email"))]
    pub email: String,
    #[serde(skip)]
    #[validate(custom(function = "validate_password"))]
    pub password1: Sensitive<String>,
    #[serde(skip)]
    pub password2: Sensitive<String>,
    pub errors: FormErrors,
}

impl SignupForm {
    /// Returns `true` when an account can be created out of the form.
    pub fn check(&mut self) -> bool {
        if let Err(errors) = self.validate() {
            self.errors = errors.into();
        }
        if self.password1.as_str() != self.password2.as_str() {
            self.errors.add("password2", PASSWORD_MISMATCH_MESSAGE);
        }
        self.errors.is_empty()
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        let email = self.email.trim();
        (!email.is_empty()).then_some(email)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LoginForm {
    pub username: String,
    #[serde(skip)]
    pub password: Sensitive<String>,
    /// Local path to go back to after signing in.
    pub next: String,
    pub errors: FormErrors,
}

impl LoginForm {
    /// Checks that both fields are filled in.
    pub fn check(&mut self) -> bool {
        if self.username.trim().is_empty() {
            self.errors.add("username", super::REQUIRED_MESSAGE);
        }
        if self.password.as_str().is_empty() {
            self.errors.add("password", super::REQUIRED_MESSAGE);
        }
        self.errors.is_empty()
    }

    /// Where to redirect after a successful login. Only paths of
    /// this site are honoured.
    #[must_use]
    pub fn redirect_to(&self) -> &str {
        let next = self.next.as_str();
        if next.starts_with('/') && !next.starts_with("//") && !next.contains('\\') {
            next
        } else {
            "/"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup() -> SignupForm {
        SignupForm {
            first_name: "Лев".into(),
            last_name: "Толстой".into(),
            username: "leo".into(),
            email: String::new(),
            password1: Sensitive::new("war and peace".into()),
            password2: Sensitive::new("war and peace".into()),
            errors: FormErrors::new(),
        }
    }

    #[test]
    fn test_valid_signup() {
        let mut form = signup();
        assert!(form.check(), "{:?}", form.errors);
        assert_eq!(form.email(), None);
    }

    #[test]
    fn test_signup_errors() {
        let mut form = SignupForm {
            username: "new".into(),
            email: "not-an-email".into(),
            password2: Sensitive::new("something else".into()),
            ..signup()
        };
        assert!(!form.check());
        assert!(form.errors.get("username").is_some());
        assert!(form.errors.get("email").is_some());
        assert_eq!(
            form.errors.get("password2"),
            Some(&[PASSWORD_MISMATCH_MESSAGE.to_string()][..])
        );
    }

    #[test]
    fn test_signup_rejects_symbols_in_username() {
        for username in ["leo+tolstoy", "leo@ya"] {
            let mut form = SignupForm {
                username: username.into(),
                ..signup()
            };
            assert!(!form.check(), "{username} was accepted");
            assert!(form.errors.get("username").is_some());
        }
    }

    #[test]
    fn test_signup_short_password() {
        let mut form = SignupForm {
            password1: Sensitive::new("short".into()),
            password2: Sensitive::new("short".into()),
            ..signup()
        };
        assert!(!form.check());
        assert!(form.errors.get("password1").is_some());
    }

    #[test]
    fn test_login_redirect_is_local_only() {
        let mut form = LoginForm {
            next: "/new/".into(),
            ..Default::default()
        };
        assert_eq!(form.redirect_to(), "/new/");

        form.next = "https://example.com/".into();
        assert_eq!(form.redirect_to(), "/");

        form.next = "//example.com/".into();
        assert_eq!(form.redirect_to(), "/");
    }

    #[test]
    fn test_login_requires_fields() {
        let mut form = LoginForm::default();
        assert!(!form.check());
        assert!(form.errors.get("username").is_some());
        assert!(form.errors.get("password").is_some());
    }
}
