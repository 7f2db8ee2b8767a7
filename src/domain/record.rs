use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::Quote;

pub type RecordId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Application,
    Contact,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Application => "application",
            RecordKind::Contact => "contact",
        }
    }

    fn id_prefix(&self) -> &'static str {
        match self {
            RecordKind::Application => "app",
            RecordKind::Contact => "c",
        }
    }

    /// Generate a fresh unique id, e.g. `app_3f2a...`.
    pub fn new_id(&self) -> RecordId {
        format!("{}_{}", self.id_prefix(), Uuid::new_v4().simple())
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

/// Who is applying or getting in touch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl ContactDetails {
    /// Phone input only accepts digits and `+`; anything else is dropped.
    pub fn new(name: impl Into<String>, email: impl Into<String>, phone: &str) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: sanitize_phone(phone),
        }
    }

    /// All three fields are required.
    pub fn validate(&self) -> Result<(), RecordError> {
        require("name", &self.name)?;
        require("email", &self.email)?;
        require("phone", &self.phone)?;
        Ok(())
    }
}

pub fn sanitize_phone(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

fn require(field: &'static str, value: &str) -> Result<(), RecordError> {
    if value.trim().is_empty() {
        Err(RecordError::MissingField(field))
    } else {
        Ok(())
    }
}

/// A submitted application: contact details plus the quote they accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub courses: Vec<String>,
    pub people: u32,
    pub subtotal: f64,
    pub discount: f64,
    pub vat: f64,
    pub total: f64,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: RecordKind,
}

impl Application {
    pub fn new(quote: &Quote, details: ContactDetails) -> Result<Self, RecordError> {
        details.validate()?;
        Ok(Self {
            id: RecordKind::Application.new_id(),
            name: details.name,
            email: details.email,
            phone: details.phone,
            courses: quote.course_names(),
            people: quote.applicant_count,
            subtotal: quote.subtotal,
            discount: quote.discount_amount,
            vat: quote.vat,
            total: quote.total,
            timestamp: Utc::now(),
            kind: RecordKind::Application,
        })
    }
}

/// A general enquiry left through the contact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: RecordId,
    #[serde(rename = "type")]
    pub kind: RecordKind,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl Contact {
    pub fn new(details: ContactDetails, message: impl Into<String>) -> Result<Self, RecordError> {
        let message = message.into();
        details.validate()?;
        require("message", &message)?;
        Ok(Self {
            id: RecordKind::Contact.new_id(),
            kind: RecordKind::Contact,
            name: details.name,
            email: details.email,
            phone: details.phone,
            message,
            timestamp: Utc::now(),
        })
    }
}
