use serde::Serialize;
use std::borrow::Cow;
use std::collections::BTreeMap;
use validator::{ValidationError, ValidationErrors};

pub mod comment;
pub mod post;
pub mod users;

pub use comment::CommentForm;
pub use post::PostForm;
pub use users::{LoginForm, SignupForm};

pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// Field error messages of a submitted form, keyed by field name.
///
/// Errors that do not belong to a single field are kept under
/// [`FormErrors::NON_FIELD`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub const NON_FIELD: &'static str = "__all__";

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(value: ValidationErrors) -> Self {
        let mut errors = Self::new();
        for (field, messages) in value.field_errors() {
            let field = field.to_string();
            for error in messages {
                let message = error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string);
                errors.add(&field, message);
            }
        }
        errors
    }
}

pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("required");
        error.message = Some(Cow::Borrowed(REQUIRED_MESSAGE));
        Err(error)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_blank() {
        assert!(not_blank("text").is_ok());
        assert!(not_blank("   \n").is_err());
        assert!(not_blank("").is_err());
    }

    #[test]
    fn test_serializes_as_map() {
        let mut errors = FormErrors::new();
        errors.add("text", REQUIRED_MESSAGE);
        errors.add("text", "Another one");

        let value = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "text": [REQUIRED_MESSAGE, "Another one"] })
        );
        assert_eq!(errors.get("text").map(<[String]>::len), Some(2));
        assert!(errors.get("group").is_none());
    }
}
