use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::RegistrationService;
use crate::domain::{format_amount, Application, Contact};

/// Snapshot of every locally saved record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordsSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub applications: Vec<Application>,
    pub contacts: Vec<Contact>,
}

/// What to export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Applications,
    Contacts,
    Full,
}

impl ExportKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "applications" => Some(ExportKind::Applications),
            "contacts" => Some(ExportKind::Contacts),
            "full" => Some(ExportKind::Full),
            _ => None,
        }
    }
}

/// Exporter for writing saved records as CSV or JSON
pub struct Exporter<'a> {
    service: &'a RegistrationService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a RegistrationService) -> Self {
        Self { service }
    }

    /// Export applications to CSV, newest first. Amounts are rounded to cents.
    pub async fn export_applications_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let applications = self.service.list_applications().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id", "timestamp", "name", "email", "phone", "courses", "people", "subtotal",
            "discount", "vat", "total",
        ])?;

        for app in &applications {
            csv_writer.write_record([
                app.id.clone(),
                app.timestamp.to_rfc3339(),
                app.name.clone(),
                app.email.clone(),
                app.phone.clone(),
                app.courses.join(";"),
                app.people.to_string(),
                format_amount(app.subtotal),
                format_amount(app.discount),
                format_amount(app.vat),
                format_amount(app.total),
            ])?;
        }

        csv_writer.flush()?;
        Ok(applications.len())
    }

    /// Export contact enquiries to CSV, newest first.
    pub async fn export_contacts_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let contacts = self.service.list_contacts().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "timestamp", "name", "email", "phone", "message"])?;

        for contact in &contacts {
            csv_writer.write_record([
                contact.id.clone(),
                contact.timestamp.to_rfc3339(),
                contact.name.clone(),
                contact.email.clone(),
                contact.phone.clone(),
                contact.message.clone(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(contacts.len())
    }

    /// Export one record list as a JSON array, exactly as stored.
    pub async fn export_json<W: Write>(&self, kind: ExportKind, mut writer: W) -> Result<usize> {
        let (json, count) = match kind {
            ExportKind::Applications => {
                let list = self.service.list_applications().await?;
                (serde_json::to_string_pretty(&list)?, list.len())
            }
            ExportKind::Contacts => {
                let list = self.service.list_contacts().await?;
                (serde_json::to_string_pretty(&list)?, list.len())
            }
            ExportKind::Full => {
                let snapshot = self.export_full_json(&mut writer).await?;
                return Ok(snapshot.applications.len() + snapshot.contacts.len());
            }
        };

        writer.write_all(json.as_bytes())?;
        writer.flush()?;
        Ok(count)
    }

    /// Export every saved record as a JSON snapshot
    pub async fn export_full_json<W: Write>(&self, mut writer: W) -> Result<RecordsSnapshot> {
        let snapshot = RecordsSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            applications: self.service.list_applications().await?,
            contacts: self.service.list_contacts().await?,
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}
