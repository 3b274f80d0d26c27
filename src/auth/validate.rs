//! Sign-up form validation.
//!
//! Runs before any provider call: a rejected form never produces a
//! network request. Failures carry the field they belong to so the
//! form can render the message inline.

use crate::error::{MoonlitError, MoonlitResult};

/// Minimum password length accepted at sign-up.
pub const MIN_PASSWORD_LEN: usize = 6;

/// The sign-up form's field values.
#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignUpForm {
    pub fn new(email: &str, password: &str, confirm_password: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm_password.to_string(),
        }
    }

    /// Validate the form. Mismatched passwords are reported before a
    /// too-short password; the email itself is the provider's to judge.
    pub fn validate(&self) -> MoonlitResult<()> {
        if self.password != self.confirm_password {
            return Err(MoonlitError::validation(
                "confirm_password",
                "Passwords do not match",
            ));
        }
        if self.password.len() < MIN_PASSWORD_LEN {
            return Err(MoonlitError::validation(
                "password",
                "Password must be at least 6 characters",
            ));
        }
        Ok(())
    }
}
