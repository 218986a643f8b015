use serde::Serialize;
use validator::Validate;

use super::FormErrors;
use crate::schema::{Group, PostView};
use crate::types::id::GroupId;

/// Submitted (or pre-filled) state of the post form.
///
/// The uploaded image is not part of this struct because it
/// arrives as a separate multipart file and is checked on its own.
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct PostForm {
    #[validate(custom(function = "super::not_blank"))]
    pub text: String,
    /// Raw value of the group `<select>`, empty when no group is picked.
    pub group: String,
    pub errors: FormErrors,
}

pub const INVALID_GROUP_MESSAGE: &str =
    "Select a valid choice. That choice is not one of the available choices.";
pub const INVALID_IMAGE_MESSAGE: &str =
    "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";
pub const IMAGE_CONTRADICTION_MESSAGE: &str =
    "Please either submit a file or check the clear checkbox, not both.";

impl PostForm {
    #[must_use]
    pub fn from_post(post: &PostView) -> Self {
        Self {
            text: post.text.clone(),
            group: post
                .group
                .as_ref()
                .map(|v| v.id.to_string())
                .unwrap_or_default(),
            errors: FormErrors::new(),
        }
    }

    /// Validates the form against the available groups, filling
    /// up [`PostForm::errors`] and returning the chosen group.
    pub fn check(&mut self, groups: &[Group]) -> Option<GroupId> {
        if let Err(errors) = self.validate() {
            self.errors = errors.into();
        }

        let group = self.group.trim();
        if group.is_empty() {
            return None;
        }

        let chosen = group
            .parse::<u64>()
            .ok()
            .and_then(GroupId::new_checked)
            .filter(|id| groups.iter().any(|g| g.id == *id));

        if chosen.is_none() {
            self.errors.add("group", INVALID_GROUP_MESSAGE);
        }
        chosen
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::form::REQUIRED_MESSAGE;

    fn groups() -> Vec<Group> {
        vec![Group {
            id: GroupId::new(3),
            title: "reader".into(),
            slug: "test".into(),
            description: "Тест".into(),
        }]
    }

    #[test]
    fn test_accepts_text_with_group() {
        let mut form = PostForm {
            text: "Новый текст".into(),
            group: "3".into(),
            ..Default::default()
        };
        assert_eq!(form.check(&groups()), Some(GroupId::new(3)));
        assert!(form.errors.is_empty());
    }

    #[test]
    fn test_group_is_optional() {
        let mut form = PostForm {
            text: "text".into(),
            ..Default::default()
        };
        assert_eq!(form.check(&groups()), None);
        assert!(form.errors.is_empty());
    }

    #[test]
    fn test_rejects_blank_text_and_unknown_group() {
        let mut form = PostForm {
            text: "  ".into(),
            group: "4".into(),
            ..Default::default()
        };
        assert_eq!(form.check(&groups()), None);
        assert_eq!(form.errors.get("text"), Some(&[REQUIRED_MESSAGE.to_string()][..]));
        assert_eq!(
            form.errors.get("group"),
            Some(&[INVALID_GROUP_MESSAGE.to_string()][..])
        );
    }
}
