// Field rules for registration input

use crate::errors::ValidationError;
use regex::Regex;
use std::sync::OnceLock;

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 50;
pub const PASSWORD_MIN_LEN: usize = 8;
/// bcrypt ignores input past 72 bytes
pub const PASSWORD_MAX_BYTES: usize = 72;
pub const EMAIL_MAX_LEN: usize = 255;

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static MISSING_FIELD_RE: OnceLock<Regex> = OnceLock::new();

fn username_pattern() -> &'static Regex {
    USERNAME_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("Invalid regex pattern"))
}

fn email_pattern() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s\p{Cc}]+@[^@\s\p{Cc}]+\.[^@\s\p{Cc}]+$")
            .expect("Invalid regex pattern")
    })
}

fn missing_field_pattern() -> &'static Regex {
    MISSING_FIELD_RE
        .get_or_init(|| Regex::new(r"missing field `([^`]+)`").expect("Invalid regex pattern"))
}

/// Types that check their own field rules after deserialization
pub trait Validate {
    /// Canonical form checked and stored; identity unless overridden
    fn normalize(self) -> Self
    where
        Self: Sized,
    {
        self
    }

    fn validate(&self) -> Result<(), ValidationError>;
}

pub fn username(value: &str) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len == 0 {
        return Err(ValidationError::MissingField("username".to_string()));
    }
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return Err(ValidationError::invalid(
            "username",
            format!(
                "must be between {} and {} characters",
                USERNAME_MIN_LEN, USERNAME_MAX_LEN
            ),
        ));
    }
    if !username_pattern().is_match(value) {
        return Err(ValidationError::invalid(
            "username",
            "may only contain letters, digits, '_', '.' and '-'",
        ));
    }
    Ok(())
}

pub fn password(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::MissingField("password".to_string()));
    }
    if value.chars().count() < PASSWORD_MIN_LEN {
        return Err(ValidationError::invalid(
            "password",
            format!("must be at least {} characters", PASSWORD_MIN_LEN),
        ));
    }
    if value.contains('\0') {
        return Err(ValidationError::invalid("password", "must not contain NUL characters"));
    }
    if value.len() > PASSWORD_MAX_BYTES {
        return Err(ValidationError::invalid(
            "password",
            format!("must be at most {} bytes", PASSWORD_MAX_BYTES),
        ));
    }
    Ok(())
}

pub fn email(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::MissingField("email".to_string()));
    }
    if value.chars().count() > EMAIL_MAX_LEN {
        return Err(ValidationError::invalid(
            "email",
            format!("must be at most {} characters", EMAIL_MAX_LEN),
        ));
    }
    if !email_pattern().is_match(value) {
        return Err(ValidationError::invalid("email", "is not a valid email address"));
    }
    Ok(())
}

/// Turn a body deserialization message into a validation error, naming the
/// field when serde reports one as missing
pub fn from_body_error(message: &str) -> ValidationError {
    match missing_field_pattern().captures(message) {
        Some(caps) => ValidationError::MissingField(caps[1].to_string()),
        None => ValidationError::InvalidJson(message.to_string()),
    }
}
