use std::collections::BTreeSet;

use thiserror::Error;

use super::{find_course, Course, CATALOG};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Unknown course: {0}")]
    UnknownCourse(String),

    #[error("Invalid number of people: '{0}'")]
    InvalidApplicantCount(String),
}

/// Transient, user-driven selection: which courses and how many applicants.
///
/// Holds only catalog ids, so resolving back to courses cannot fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    selected: BTreeSet<&'static str>,
    applicant_input: String,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            selected: BTreeSet::new(),
            applicant_input: "1".to_string(),
        }
    }
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a selection from course ids and an applicant count typed in full,
    /// e.g. a command-line argument. Anything but digits is rejected.
    pub fn from_input<S: AsRef<str>>(
        course_ids: &[S],
        applicant_input: &str,
    ) -> Result<Self, SelectionError> {
        let mut state = Self::new();
        for id in course_ids {
            state.select(id.as_ref())?;
        }
        state.set_applicant_input(applicant_input)?;
        Ok(state)
    }

    /// Add a course to the selection. Selecting twice is a no-op.
    pub fn select(&mut self, id: &str) -> Result<(), SelectionError> {
        let course = lookup(id)?;
        self.selected.insert(course.id);
        Ok(())
    }

    /// Add the course if absent, remove it if present.
    /// Returns whether the course is selected afterwards.
    pub fn toggle(&mut self, id: &str) -> Result<bool, SelectionError> {
        let course = lookup(id)?;
        if self.selected.remove(course.id) {
            Ok(false)
        } else {
            self.selected.insert(course.id);
            Ok(true)
        }
    }

    pub fn is_selected(&self, id: &str) -> bool {
        find_course(id).is_some_and(|c| self.selected.contains(c.id))
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    /// Store the applicant count field as entered. Surrounding whitespace is
    /// ignored; any other non-digit leaves the field unchanged.
    pub fn set_applicant_input(&mut self, input: &str) -> Result<(), SelectionError> {
        let input = input.trim();
        if !input.chars().all(|c| c.is_ascii_digit()) {
            return Err(SelectionError::InvalidApplicantCount(input.to_string()));
        }
        self.applicant_input = input.to_string();
        Ok(())
    }

    /// Keystroke-style update for a numeric-only field: non-digits are dropped.
    /// The user sees the filtered value before calculating.
    pub fn filter_applicant_input(&mut self, input: &str) {
        self.applicant_input = input.chars().filter(char::is_ascii_digit).collect();
    }

    pub fn applicant_input(&self) -> &str {
        &self.applicant_input
    }

    /// Parsed applicant count, or `None` when missing, zero or out of range.
    pub fn applicant_count(&self) -> Option<u32> {
        self.applicant_input
            .parse::<u32>()
            .ok()
            .filter(|n| *n >= 1)
    }

    /// Selected courses in catalog order.
    pub fn resolve(&self) -> Vec<&'static Course> {
        CATALOG
            .iter()
            .filter(|c| self.selected.contains(c.id))
            .collect()
    }

    /// Restart: nothing selected, one applicant.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

fn lookup(id: &str) -> Result<&'static Course, SelectionError> {
    find_course(id).ok_or_else(|| SelectionError::UnknownCourse(id.to_string()))
}
