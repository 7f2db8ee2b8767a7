use tracing::{info, warn};

use crate::domain::{
    compute_quote, estimate_by_months, find_course, Application, Contact, ContactDetails, Course,
    Quote, SelectionState,
};
use crate::storage::{Repository, APPLICATIONS_KEY, CONTACTS_KEY};

use super::AppError;

/// Application service providing the registration use cases.
/// This is the primary interface for any client (CLI, TUI, tests).
pub struct RegistrationService {
    repo: Repository,
}

/// Result of a by-the-month estimate for one course
#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    pub course: &'static Course,
    pub months: u32,
    pub total: f64,
}

/// Validate a selection and compute its quote. Needs no store.
pub fn quote_selection(selection: &SelectionState) -> Result<Quote, AppError> {
    if selection.selected_count() == 0 {
        return Err(AppError::NoCoursesSelected);
    }
    let applicant_count = selection.applicant_count().ok_or_else(|| {
        AppError::InvalidApplicantCount(selection.applicant_input().to_string())
    })?;

    Ok(compute_quote(&selection.resolve(), applicant_count))
}

/// Flat `fee * months` estimate for a single course.
pub fn estimate_course(course_id: &str, months: u32) -> Result<Estimate, AppError> {
    let course =
        find_course(course_id).ok_or_else(|| AppError::UnknownCourse(course_id.to_string()))?;
    if months == 0 {
        return Err(AppError::InvalidMonths(months));
    }

    Ok(Estimate {
        course,
        months,
        total: estimate_by_months(course, months),
    })
}

impl RegistrationService {
    /// Create a new service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    // ========================
    // Quotation
    // ========================

    /// Validate the selection and compute its quote.
    pub fn quote(&self, selection: &SelectionState) -> Result<Quote, AppError> {
        quote_selection(selection)
    }

    // ========================
    // Records
    // ========================

    /// Turn a quote plus contact details into a saved application.
    /// Nothing is written if validation or the store fails.
    pub async fn submit_application(
        &self,
        quote: &Quote,
        details: ContactDetails,
    ) -> Result<Application, AppError> {
        let application = Application::new(quote, details)?;

        let count = self
            .repo
            .prepend(APPLICATIONS_KEY, &application)
            .await
            .inspect_err(|e| warn!(error = %e, "could not save application"))?;

        info!(id = %application.id, total = application.total, saved = count, "application saved");
        Ok(application)
    }

    /// Save a contact enquiry. All fields are required.
    pub async fn save_contact(
        &self,
        details: ContactDetails,
        message: impl Into<String>,
    ) -> Result<Contact, AppError> {
        let contact = Contact::new(details, message)?;

        let count = self
            .repo
            .prepend(CONTACTS_KEY, &contact)
            .await
            .inspect_err(|e| warn!(error = %e, "could not save contact"))?;

        info!(id = %contact.id, saved = count, "contact saved");
        Ok(contact)
    }

    /// Saved applications, newest first.
    pub async fn list_applications(&self) -> Result<Vec<Application>, AppError> {
        Ok(self.repo.load_list(APPLICATIONS_KEY).await?)
    }

    /// Saved contacts, newest first.
    pub async fn list_contacts(&self) -> Result<Vec<Contact>, AppError> {
        Ok(self.repo.load_list(CONTACTS_KEY).await?)
    }

    /// Delete every saved application. Contacts are kept.
    pub async fn clear_applications(&self) -> Result<(), AppError> {
        self.repo.remove(APPLICATIONS_KEY).await?;
        info!("saved applications cleared");
        Ok(())
    }

    /// Delete all local data: applications and contacts.
    pub async fn clear_all(&self) -> Result<(), AppError> {
        self.repo.remove(APPLICATIONS_KEY).await?;
        self.repo.remove(CONTACTS_KEY).await?;
        info!("all local data cleared");
        Ok(())
    }

    /// Direct access to the underlying store.
    pub fn repository(&self) -> &Repository {
        &self.repo
    }
}
