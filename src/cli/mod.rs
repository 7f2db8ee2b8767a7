use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};

use crate::application::{estimate_course, quote_selection, AppError, RegistrationService};
use crate::domain::{
    format_currency, format_rate, Application, ContactDetails, Quote, SelectionState,
};

/// Enroll - course fees and applications
#[derive(Parser)]
#[command(name = "enroll")]
#[command(about = "Browse training courses, quote fees and keep applications locally")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, env = "ENROLL_DB", default_value = "enroll.db")]
    pub database: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// List the course catalog
    Courses {
        /// Show the full course description
        #[arg(long)]
        details: bool,
    },

    /// Calculate a fee quotation
    Quote {
        /// Course id (repeat for several courses)
        #[arg(short, long = "course", required = true)]
        courses: Vec<String>,

        /// Number of people applying
        #[arg(short, long, default_value = "1")]
        people: String,
    },

    /// Estimate the cost of one course over a number of months
    Estimate {
        /// Course id
        course: String,

        /// Number of months
        #[arg(short, long)]
        months: u32,
    },

    /// Calculate a quotation and submit an application for it
    Apply {
        /// Course id (repeat for several courses)
        #[arg(short, long = "course", required = true)]
        courses: Vec<String>,

        /// Number of people applying
        #[arg(short, long, default_value = "1")]
        people: String,

        /// Full name
        #[arg(long, default_value = "")]
        name: String,

        /// Email address
        #[arg(long, default_value = "")]
        email: String,

        /// Phone number (digits and '+' only)
        #[arg(long, default_value = "")]
        phone: String,
    },

    /// Leave a contact enquiry
    Contact {
        /// Full name
        #[arg(long, default_value = "")]
        name: String,

        /// Email address
        #[arg(long, default_value = "")]
        email: String,

        /// Phone number (digits and '+' only)
        #[arg(long, default_value = "")]
        phone: String,

        /// Message
        #[arg(short, long, default_value = "")]
        message: String,
    },

    /// List saved applications
    Applications,

    /// List saved contact enquiries
    Contacts,

    /// Delete locally saved data
    Clear {
        /// Only delete applications, keep contacts
        #[arg(long)]
        applications_only: bool,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Export saved records to CSV or JSON
    Export {
        /// What to export: applications, contacts, full
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Format: csv, json (default: csv, json for full)
        #[arg(short, long)]
        format: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                RegistrationService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Courses { details } => run_courses_command(details),

            Commands::Quote { courses, people } => {
                let selection = SelectionState::from_input(&courses, &people)
                    .map_err(AppError::from)?;
                let quote = quote_selection(&selection)?;
                print_quote(&quote);
            }

            Commands::Estimate { course, months } => {
                let estimate = estimate_course(&course, months)?;
                println!(
                    "Total cost of {} for {} month(s): {}",
                    estimate.course.name,
                    estimate.months,
                    format_currency(estimate.total)
                );
            }

            Commands::Apply {
                courses,
                people,
                name,
                email,
                phone,
            } => {
                let service = RegistrationService::init(&self.database)
                    .await
                    .map_err(save_error("application"))?;
                let selection = SelectionState::from_input(&courses, &people)
                    .map_err(AppError::from)?;
                let quote = service.quote(&selection)?;
                let details = ContactDetails::new(name, email, &phone);

                let application = service
                    .submit_application(&quote, details)
                    .await
                    .map_err(save_error("application"))?;
                print_receipt(&quote, &application);
            }

            Commands::Contact {
                name,
                email,
                phone,
                message,
            } => {
                let service = RegistrationService::init(&self.database)
                    .await
                    .map_err(save_error("contact"))?;
                let details = ContactDetails::new(name, email, &phone);
                let contact = service
                    .save_contact(details, message)
                    .await
                    .map_err(save_error("contact"))?;
                println!("Contact saved locally ({})", contact.id);
            }

            Commands::Applications => {
                let service = RegistrationService::init(&self.database).await?;
                run_applications_command(&service).await?;
            }

            Commands::Contacts => {
                let service = RegistrationService::init(&self.database).await?;
                run_contacts_command(&service).await?;
            }

            Commands::Clear {
                applications_only,
                yes,
            } => {
                let service = RegistrationService::init(&self.database).await?;
                run_clear_command(&service, applications_only, yes).await?;
            }

            Commands::Export {
                export_type,
                output,
                format,
            } => {
                let service = RegistrationService::init(&self.database).await?;
                run_export_command(&service, &export_type, output.as_deref(), format.as_deref())
                    .await?;
            }
        }

        Ok(())
    }
}

/// Validation errors pass through; storage failures become a generic notice.
fn save_error(what: &'static str) -> impl Fn(AppError) -> anyhow::Error {
    move |err| {
        if err.is_validation() {
            anyhow::Error::new(err)
        } else {
            anyhow::Error::new(err).context(format!("Could not save {} locally", what))
        }
    }
}

fn run_courses_command(details: bool) {
    println!(
        "{:<14} {:<16} {:>10} {:<10} {:<6}",
        "ID", "NAME", "FEE", "DURATION", "TYPE"
    );
    println!("{}", "-".repeat(60));
    for course in crate::domain::CATALOG {
        println!(
            "{:<14} {:<16} {:>10} {:<10} {:<6}",
            course.id,
            course.name,
            format_currency(f64::from(course.fee)),
            course.duration_label,
            course.course_type.as_str()
        );
        if details {
            println!("    {}", course.summary);
            println!("    {}", course.details);
            println!();
        }
    }
}

fn print_quote(quote: &Quote) {
    println!("Quotation");
    println!("  Courses:  {}", quote.course_names().join(", "));
    println!("  People:   {}", quote.applicant_count);
    println!("  Subtotal: {}", format_currency(quote.subtotal));
    println!(
        "  Discount ({}): -{}",
        format_rate(quote.discount_rate),
        format_currency(quote.discount_amount)
    );
    println!("  After discount: {}", format_currency(quote.after_discount));
    println!("  VAT (15%): {}", format_currency(quote.vat));
    println!("  Total: {}", format_currency(quote.total));
}

fn print_receipt(quote: &Quote, application: &Application) {
    println!("Application submitted");
    println!("  Reference: {}", application.id);
    println!("  Name:      {}", application.name);
    println!("  Email:     {}", application.email);
    println!("  Phone:     {}", application.phone);
    println!(
        "  Date:      {}",
        application.timestamp.format("%Y-%m-%d %H:%M:%S")
    );
    println!();
    print_quote(quote);
}

async fn run_applications_command(service: &RegistrationService) -> Result<()> {
    let applications = service
        .list_applications()
        .await
        .context("Could not read saved applications")?;

    if applications.is_empty() {
        println!("No saved applications yet.");
        return Ok(());
    }

    for app in &applications {
        println!("{} - {}", app.name, app.courses.join(", "));
        println!("  People: {}", app.people);
        println!("  Total:  {}", format_currency(app.total));
        println!("  {}", app.timestamp.format("%Y-%m-%d %H:%M:%S"));
    }
    Ok(())
}

async fn run_contacts_command(service: &RegistrationService) -> Result<()> {
    let contacts = service
        .list_contacts()
        .await
        .context("Could not read contacts")?;

    if contacts.is_empty() {
        println!("No saved contacts");
        return Ok(());
    }

    println!("{} saved locally.", contacts.len());
    for contact in &contacts {
        println!(
            "{}  {} <{}> {}",
            contact.timestamp.format("%Y-%m-%d %H:%M"),
            contact.name,
            contact.email,
            contact.phone
        );
        println!("  {}", truncate(&contact.message, 70));
    }
    Ok(())
}

async fn run_clear_command(
    service: &RegistrationService,
    applications_only: bool,
    yes: bool,
) -> Result<()> {
    let prompt = if applications_only {
        "Delete all saved applications?"
    } else {
        "This will remove saved applications and contacts from local storage. Continue?"
    };

    if !yes && !confirm(prompt)? {
        println!("Cancelled.");
        return Ok(());
    }

    if applications_only {
        service.clear_applications().await?;
        println!("Saved applications removed.");
    } else {
        service.clear_all().await?;
        println!("Saved local data removed.");
    }
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Export output, decided before any file is touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExportAction {
    ApplicationsCsv,
    ContactsCsv,
    Json(crate::io::ExportKind),
}

fn resolve_export_action(export_type: &str, format: Option<&str>) -> Result<ExportAction> {
    use crate::io::ExportKind;

    let kind = ExportKind::from_str(export_type).ok_or_else(|| {
        anyhow::anyhow!(
            "Invalid export type '{}'. Valid types: applications, contacts, full",
            export_type
        )
    })?;

    let format = match (format, kind) {
        (Some(f), _) => f.to_lowercase(),
        (None, ExportKind::Full) => "json".to_string(),
        (None, _) => "csv".to_string(),
    };

    match (kind, format.as_str()) {
        (ExportKind::Applications, "csv") => Ok(ExportAction::ApplicationsCsv),
        (ExportKind::Contacts, "csv") => Ok(ExportAction::ContactsCsv),
        (ExportKind::Full, "csv") => anyhow::bail!("Full export is only available as json"),
        (kind, "json") => Ok(ExportAction::Json(kind)),
        (_, other) => anyhow::bail!("Invalid format '{}'. Valid formats: csv, json", other),
    }
}

async fn run_export_command(
    service: &RegistrationService,
    export_type: &str,
    output: Option<&str>,
    format: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::stdout;

    let action = resolve_export_action(export_type, format)?;

    // The output file is only created once the export has rendered
    let mut buffer = Vec::new();
    let exporter = Exporter::new(service);
    let count = match action {
        ExportAction::ApplicationsCsv => exporter.export_applications_csv(&mut buffer).await?,
        ExportAction::ContactsCsv => exporter.export_contacts_csv(&mut buffer).await?,
        ExportAction::Json(kind) => exporter.export_json(kind, &mut buffer).await?,
    };

    match output {
        Some(path) => {
            let mut file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            file.write_all(&buffer)
                .with_context(|| format!("Failed to write output file: {}", path))?;
            eprintln!("Exported {} record(s) to {}", count, path);
        }
        None => {
            let mut out = stdout();
            out.write_all(&buffer)?;
            out.flush()?;
        }
    }
    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ExportKind;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_export_action() {
        assert_eq!(
            resolve_export_action("applications", None).unwrap(),
            ExportAction::ApplicationsCsv
        );
        assert_eq!(
            resolve_export_action("full", None).unwrap(),
            ExportAction::Json(ExportKind::Full)
        );
        assert_eq!(
            resolve_export_action("contacts", Some("JSON")).unwrap(),
            ExportAction::Json(ExportKind::Contacts)
        );
        assert!(resolve_export_action("full", Some("csv")).is_err());
        assert!(resolve_export_action("applications", Some("xml")).is_err());
        assert!(resolve_export_action("budgets", None).is_err());
    }

    #[tokio::test]
    async fn test_rejected_export_keeps_existing_file() -> Result<()> {
        let temp = TempDir::new()?;
        let service =
            RegistrationService::init(temp.path().join("test.db").to_str().unwrap()).await?;
        let target = temp.path().join("keep.json");
        std::fs::write(&target, "existing export")?;

        let err = run_export_command(&service, "full", target.to_str(), Some("csv"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Full export is only available as json");

        let err = run_export_command(&service, "contacts", target.to_str(), Some("xml"))
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Invalid format"));

        assert_eq!(std::fs::read_to_string(&target)?, "existing export");
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_read_keeps_existing_file() -> Result<()> {
        let temp = TempDir::new()?;
        let service =
            RegistrationService::init(temp.path().join("test.db").to_str().unwrap()).await?;
        service
            .repository()
            .set(crate::storage::CONTACTS_KEY, "not a json list")
            .await?;
        let target = temp.path().join("contacts.csv");
        std::fs::write(&target, "existing export")?;

        assert!(
            run_export_command(&service, "contacts", target.to_str(), None)
                .await
                .is_err()
        );
        assert_eq!(std::fs::read_to_string(&target)?, "existing export");
        Ok(())
    }

    #[tokio::test]
    async fn test_export_writes_file() -> Result<()> {
        let temp = TempDir::new()?;
        let service =
            RegistrationService::init(temp.path().join("test.db").to_str().unwrap()).await?;
        let target = temp.path().join("apps.json");
        std::fs::write(&target, "old")?;

        run_export_command(&service, "applications", target.to_str(), Some("json")).await?;
        assert_eq!(std::fs::read_to_string(&target)?, "[]");
        Ok(())
    }

    #[tokio::test]
    async fn test_unopenable_store_reports_save_notice() -> Result<()> {
        let temp = TempDir::new()?;
        let db = temp.path().join("missing").join("dir").join("test.db");
        let db = db.to_str().unwrap();

        let cli = Cli::try_parse_from([
            "enroll", "-d", db, "contact", "--name", "Lindiwe", "--email",
            "lindiwe@example.com", "--phone", "0115550100", "-m", "Hello",
        ])?;
        let err = cli.run().await.unwrap_err();
        assert_eq!(err.to_string(), "Could not save contact locally");

        let cli = Cli::try_parse_from([
            "enroll", "-d", db, "apply", "-c", "sewing", "--name", "Lindiwe", "--email",
            "lindiwe@example.com", "--phone", "0115550100",
        ])?;
        let err = cli.run().await.unwrap_err();
        assert_eq!(err.to_string(), "Could not save application locally");
        Ok(())
    }

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes("\n"));
        assert!(!is_yes("no"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a much longer message", 10), "a much ...");
    }

    #[test]
    fn test_clear_flags() {
        let cli = Cli::try_parse_from(["enroll", "clear", "--applications-only", "-y"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Clear {
                applications_only: true,
                yes: true
            }
        ));
    }

    #[test]
    fn test_cli_parses_repeated_courses() {
        let cli = Cli::try_parse_from([
            "enroll", "quote", "-c", "firstaid", "-c", "sewing", "-p", "2",
        ])
        .unwrap();
        match cli.command {
            Commands::Quote { courses, people } => {
                assert_eq!(courses, vec!["firstaid", "sewing"]);
                assert_eq!(people, "2");
            }
            _ => panic!("expected quote command"),
        }
    }
}
