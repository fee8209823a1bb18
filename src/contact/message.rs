//! Contact message validation

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ContactError;
use crate::models::ContactRequest;

const MAX_NAME: usize = 100;
const MAX_EMAIL: usize = 254;
const MAX_MESSAGE: usize = 5000;

/// A validated, trimmed contact submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
    pub received_at: DateTime<Utc>,
    /// Rate-limit token of the sender
    pub sender: String,
}

impl ContactMessage {
    /// Validates a raw request. Lengths are counted in characters.
    pub fn from_request(
        request: ContactRequest,
        sender: impl Into<String>,
        received_at: DateTime<Utc>,
    ) -> Result<Self, ContactError> {
        let name = request.name.trim().to_string();
        let email = request.email.trim().to_string();
        let message = request.message.trim().to_string();

        check_length("name", &name, MAX_NAME)?;
        check_length("email", &email, MAX_EMAIL)?;
        check_length("message", &message, MAX_MESSAGE)?;
        if !looks_like_email(&email) {
            return Err(ContactError::Invalid(format!(
                "'{}' is not a valid email address",
                email
            )));
        }

        Ok(Self {
            name,
            email,
            message,
            received_at,
            sender: sender.into(),
        })
    }
}

fn check_length(field: &str, value: &str, max: usize) -> Result<(), ContactError> {
    let len = value.chars().count();
    if len == 0 {
        return Err(ContactError::Invalid(format!("{} is required", field)));
    }
    if len > max {
        return Err(ContactError::Invalid(format!(
            "{} exceeds maximum length of {} characters",
            field, max
        )));
    }
    Ok(())
}

fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}
