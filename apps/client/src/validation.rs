use std::borrow::Cow;

use campus_proto::requests::UpdateProfileRequest;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::{AppError, AppResult};

const MAX_COMMENT_LEN: usize = 2000;

pub fn validate_username(value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if !(3..=32).contains(&len) {
        return Err(message(
            "username_length",
            "Username must be 3-32 characters",
        ));
    }

    if trimmed
        .chars()
        .any(|c| c.is_whitespace() || c.is_control() || c == '<' || c == '>')
    {
        return Err(message(
            "username_chars",
            "Username may not contain spaces or angle brackets",
        ));
    }

    Ok(())
}

pub fn validate_comment(value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(message("comment_empty", "Comment cannot be empty"));
    }
    if trimmed.chars().count() > MAX_COMMENT_LEN {
        return Err(message("comment_length", "Comment is too long"));
    }
    Ok(())
}

fn validate_passwords_match(form: &ProfileForm) -> Result<(), ValidationError> {
    let password = form.password.as_deref().unwrap_or_default();
    let confirmation = form.password_confirmation.as_deref().unwrap_or_default();
    if password != confirmation {
        return Err(message("password_mismatch", "Passwords do not match"));
    }
    Ok(())
}

fn message(code: &'static str, text: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(text));
    err
}

/// Human readable text for the first failing field, in field name order.
/// Struct-level errors (`__all__`) sort ahead of named fields.
pub fn first_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);

    fields
        .into_iter()
        .find_map(|(field, errs)| errs.first().map(|err| (field, err)))
        .map(|(field, err)| match &err.message {
            Some(text) => text.to_string(),
            None => format!("{field}: {}", err.code),
        })
        .unwrap_or_else(|| "Invalid input".to_string())
}

/// Trimmed value, or a validation error naming the field.
pub fn require_text(value: &str, label: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{label} is required")));
    }
    Ok(trimmed.to_string())
}

pub fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Basic profile form as typed by the user.
#[derive(Debug, Clone, Default, Validate)]
#[validate(schema(function = "validate_passwords_match", skip_on_field_errors = false))]
pub struct ProfileForm {
    #[validate(custom(function = "validate_username"))]
    pub username: String,
    #[validate(email(message = "Email address is not valid"))]
    pub email: Option<String>,
    #[validate(length(max = 500, message = "Bio is too long"))]
    pub bio: Option<String>,
    pub major: Option<String>,
    pub password: Option<String>,
    pub password_confirmation: Option<String>,
}

impl ProfileForm {
    pub fn into_request(self) -> AppResult<UpdateProfileRequest> {
        self.validate()?;
        Ok(UpdateProfileRequest {
            username: self.username.trim().to_string(),
            email: self.email,
            bio: self.bio,
            major: self.major,
            password: self.password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppErrorCode;

    fn form() -> ProfileForm {
        ProfileForm {
            username: "alice_01".to_string(),
            email: Some("alice@campus.edu".to_string()),
            ..ProfileForm::default()
        }
    }

    #[test]
    fn username_validation_checks_length_and_chars() {
        assert!(validate_username("alice_01").is_ok());
        assert!(validate_username("李小明").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("bad name").is_err());
        assert!(validate_username("<b>oss").is_err());
    }

    #[test]
    fn mismatched_passwords_are_rejected_before_any_request() {
        let mut form = form();
        form.password = Some("secret-1".to_string());
        form.password_confirmation = Some("secret-2".to_string());

        let err = form.into_request().unwrap_err();
        assert_eq!(err.code, AppErrorCode::Validation);
        assert_eq!(err.message, "Passwords do not match");
    }

    #[test]
    fn matching_passwords_build_the_request() {
        let mut form = form();
        form.password = Some("secret-1".to_string());
        form.password_confirmation = Some("secret-1".to_string());

        let request = form.into_request().expect("valid form");
        assert_eq!(request.username, "alice_01");
        assert_eq!(request.password.as_deref(), Some("secret-1"));
    }

    #[test]
    fn bad_email_reports_its_message() {
        let mut form = form();
        form.email = Some("not-an-email".to_string());

        let err = form.into_request().unwrap_err();
        assert_eq!(err.message, "Email address is not valid");
    }

    #[test]
    fn require_text_trims_and_rejects_blank() {
        assert_eq!(require_text("  hi ", "Title").expect("text"), "hi");
        assert_eq!(
            require_text("   ", "Title").unwrap_err().message,
            "Title is required"
        );
        assert_eq!(non_blank("  "), None);
    }
}
