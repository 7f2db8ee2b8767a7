mod repository;

pub use repository::*;

/// SQL migration for the key-value table
pub const MIGRATION_001_INITIAL: &str = include_str!("migrations/001_initial.sql");

/// Key holding the JSON list of applications, newest first.
pub const APPLICATIONS_KEY: &str = "@en_applications_v1";

/// Key holding the JSON list of contact enquiries, newest first.
pub const CONTACTS_KEY: &str = "@en_contacts_v1";
