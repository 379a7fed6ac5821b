//! Validation of user-entered account data.

use std::sync::LazyLock;

use regex::Regex;

/// Minimum password length, counted after trimming surrounding whitespace.
pub const MIN_PASSWORD_LENGTH: usize = 9;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9+._%\-]{1,256}@[a-zA-Z0-9][a-zA-Z0-9\-]{0,64}(\.[a-zA-Z0-9][a-zA-Z0-9\-]{0,25})+$",
    )
    .expect("email pattern is valid")
});

/// Checks whether a string matches some pattern.
pub trait PatternValidator: Send + Sync {
    fn matches(&self, value: &str) -> bool;
}

/// Matches conventional `local@domain.tld` addresses.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailPatternValidator;

impl PatternValidator for EmailPatternValidator {
    fn matches(&self, value: &str) -> bool {
        EMAIL_PATTERN.is_match(value)
    }
}

/// Outcome of each password rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PasswordValidationState {
    pub has_min_length: bool,
    pub has_upper_case: bool,
    pub has_lower_case: bool,
    pub has_digit: bool,
}

impl PasswordValidationState {
    pub fn is_valid(&self) -> bool {
        self.has_min_length && self.has_upper_case && self.has_lower_case && self.has_digit
    }
}

/// Validates email addresses and passwords before they are sent anywhere.
#[derive(Debug, Clone)]
pub struct UserDataValidator<P = EmailPatternValidator> {
    pattern: P,
}

impl Default for UserDataValidator {
    fn default() -> Self {
        Self::new(EmailPatternValidator)
    }
}

impl<P: PatternValidator> UserDataValidator<P> {
    pub fn new(pattern: P) -> Self {
        Self { pattern }
    }

    pub fn is_valid_email(&self, email: &str) -> bool {
        self.pattern.matches(email.trim())
    }

    pub fn validate_password(&self, password: &str) -> PasswordValidationState {
        PasswordValidationState {
            has_min_length: password.trim().chars().count() >= MIN_PASSWORD_LENGTH,
            has_upper_case: password.chars().any(char::is_uppercase),
            has_lower_case: password.chars().any(char::is_lowercase),
            has_digit: password.chars().any(|c| c.is_ascii_digit()),
        }
    }
}
