use serde::Serialize;
use validator::Validate;

use super::FormErrors;

#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct CommentForm {
    #[validate(custom(function = "super::not_blank"))]
    pub text: String,
    pub errors: FormErrors,
}

impl CommentForm {
    /// Returns `true` when the comment can be saved.
    pub fn check(&mut self) -> bool {
        if let Err(errors) = self.validate() {
            self.errors = errors.into();
        }
        self.errors.is_empty()
    }
}
