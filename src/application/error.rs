use thiserror::Error;

use crate::domain::{RecordError, SelectionError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Please select at least one course")]
    NoCoursesSelected,

    #[error("Invalid number of people: '{0}' (enter at least 1)")]
    InvalidApplicantCount(String),

    #[error("Invalid number of months: {0} (enter at least 1)")]
    InvalidMonths(u32),

    #[error("Unknown course: {0}")]
    UnknownCourse(String),

    #[error("Please fill in the {0} field")]
    MissingField(&'static str),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl AppError {
    /// Validation errors block the action before anything is computed or saved.
    pub fn is_validation(&self) -> bool {
        !matches!(self, AppError::Storage(_))
    }
}

impl From<SelectionError> for AppError {
    fn from(err: SelectionError) -> Self {
        match err {
            SelectionError::UnknownCourse(id) => AppError::UnknownCourse(id),
            SelectionError::InvalidApplicantCount(input) => AppError::InvalidApplicantCount(input),
        }
    }
}

impl From<RecordError> for AppError {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::MissingField(field) => AppError::MissingField(field),
        }
    }
}
