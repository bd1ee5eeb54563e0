//! Contact form validation.
//!
//! A submitted form validates into a [`ContactMessage`], which the
//! session forwards to the remote store on a best-effort basis (same
//! policy as cart sync: failures are logged, never surfaced).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use coursecart_core::Email;

use crate::error::ValidationError;

/// Contact form fields as typed, unvalidated.
#[derive(Debug, Clone, Default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactForm {
    /// Validate the form into a [`ContactMessage`], stamping it with
    /// the submission time.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the name or message is blank or the
    /// email does not parse.
    pub fn validate(&self) -> Result<ContactMessage, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        let body = self.message.trim();
        if body.is_empty() {
            return Err(ValidationError::MissingField("message"));
        }
        let email = Email::parse(self.email.trim())?;
        Ok(ContactMessage {
            name: name.to_string(),
            email,
            body: body.to_string(),
            sent_at: Utc::now(),
        })
    }
}

/// A validated contact message ready to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: Email,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}
