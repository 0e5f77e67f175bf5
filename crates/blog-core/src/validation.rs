//! Input validation for comments, posts and accounts.
//!
//! Validators collect every violation instead of stopping at the first one,
//! so a caller can report them all at once.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::domain::MAX_COMMENT_LEN;

pub const MIN_COMMENT_LEN: usize = 3;
pub const MAX_TITLE_LEN: usize = 200;
pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_USERNAME_LEN: usize = 150;
pub const MAX_EMAIL_LEN: usize = 254;

static IMAGE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[[^\]]*\]\([^)]*\)").expect("image pattern is valid"));

// No lookbehind in `regex`, so the character before `[` is matched explicitly.
static LINK_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[^!])\[[^\]]*\]\([^)]*\)").expect("link pattern is valid"));

static USERNAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w.@+-]+$").expect("username pattern is valid"));

/// A single violation tied to an input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// All violations found in one input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether any violation concerns `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// `Ok(())` when nothing was collected.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl From<FieldError> for ValidationErrors {
    fn from(error: FieldError) -> Self {
        Self(vec![error])
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate comment content.
pub fn validate_comment(content: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let trimmed = content.trim();
    let len = trimmed.chars().count();

    if trimmed.is_empty() {
        errors.add("content", "This field is required.");
    } else if len < MIN_COMMENT_LEN {
        errors.add(
            "content",
            format!("Comment must be at least {MIN_COMMENT_LEN} characters long."),
        );
    }

    if len > MAX_COMMENT_LEN {
        errors.add(
            "content",
            format!("Ensure this value has at most {MAX_COMMENT_LEN} characters (it has {len})."),
        );
    }

    if IMAGE_PATTERN.is_match(content) {
        errors.add("content", "Images are not allowed in comments.");
    }

    if LINK_PATTERN.is_match(content) {
        errors.add("content", "Links are not allowed in comments.");
    }

    errors.into_result()
}

/// Validate a post's title and content.
pub fn validate_post(title: &str, content: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let title = title.trim();

    if title.is_empty() {
        errors.add("title", "This field is required.");
    } else if title.chars().count() > MAX_TITLE_LEN {
        errors.add(
            "title",
            format!("Ensure this value has at most {MAX_TITLE_LEN} characters."),
        );
    }

    if content.trim().is_empty() {
        errors.add("content", "This field is required.");
    }

    errors.into_result()
}

/// Fields submitted when signing up.
#[derive(Debug, Clone)]
pub struct RegistrationForm<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub password_confirm: &'a str,
}

/// Validate a sign-up form.
pub fn validate_registration(form: &RegistrationForm<'_>) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let username = form.username.trim();
    let email = form.email.trim();

    if username.is_empty() {
        errors.add("username", "This field is required.");
    } else if username.chars().count() > MAX_USERNAME_LEN {
        errors.add(
            "username",
            format!("Ensure this value has at most {MAX_USERNAME_LEN} characters."),
        );
    } else if !USERNAME_PATTERN.is_match(username) {
        errors.add(
            "username",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        );
    }

    if email.is_empty() {
        errors.add("email", "This field is required.");
    } else if email.chars().count() > MAX_EMAIL_LEN {
        errors.add(
            "email",
            format!("Ensure this value has at most {MAX_EMAIL_LEN} characters."),
        );
    } else if !email.contains('@') {
        errors.add("email", "Enter a valid email address.");
    }

    if form.password.chars().count() < MIN_PASSWORD_LEN {
        errors.add(
            "password",
            format!("Ensure this field has at least {MIN_PASSWORD_LEN} characters."),
        );
    }

    if form.password != form.password_confirm {
        errors.add("password_confirm", "Passwords don't match.");
    }

    errors.into_result()
}

/// Validate a login attempt's shape; credentials are checked elsewhere.
pub fn validate_credentials(username: &str, password: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    if username.trim().is_empty() {
        errors.add("username", "This field is required.");
    }
    if password.is_empty() {
        errors.add("password", "This field is required.");
    }

    errors.into_result()
}
