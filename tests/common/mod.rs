// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use enroll::application::RegistrationService;
use enroll::domain::{ContactDetails, Quote, SelectionState};
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(RegistrationService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = RegistrationService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Quote for the given course ids and applicant count
pub fn quote_for(service: &RegistrationService, ids: &[&str], people: &str) -> Quote {
    let selection = SelectionState::from_input(ids, people).unwrap();
    service.quote(&selection).unwrap()
}

/// Test fixture: complete contact details
pub fn details(name: &str) -> ContactDetails {
    let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
    ContactDetails::new(name, email, "+27 11 555 0100")
}
