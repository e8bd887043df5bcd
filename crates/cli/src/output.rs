//! Terminal output helpers

use colored::Colorize;
use studio_state::{SaveEvent, SaveOutcome};

pub fn success(message: impl AsRef<str>) {
    println!("{} {}", "✓".green().bold(), message.as_ref());
}

pub fn warning(message: impl AsRef<str>) {
    println!("{} {}", "!".yellow().bold(), message.as_ref());
}

pub fn failure(message: impl AsRef<str>) {
    println!("{} {}", "✗".red().bold(), message.as_ref());
}

pub fn heading(title: impl AsRef<str>) {
    println!("{}", title.as_ref().bold().underline());
}

/// Print an aligned `label: value` line
pub fn field(label: &str, value: impl std::fmt::Display) {
    println!("  {:<15} {}", format!("{}:", label).dimmed(), value);
}

pub fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

/// Print one autosave notification
pub fn save_event(event: &SaveEvent) {
    match event {
        SaveEvent::Started => println!("  {} saving", "…".cyan()),
        SaveEvent::Succeeded { at, saved } => success(format!(
            "Saved {} (id {}) at {}",
            saved.document.name,
            saved.schema_id().unwrap_or("-"),
            at.format("%H:%M:%S%.3f")
        )),
        SaveEvent::Failed { error } => failure(format!("Save failed: {}", error)),
    }
}

/// Print the outcome of an explicit flush
pub fn save_outcome(outcome: &SaveOutcome) {
    match outcome {
        SaveOutcome::Saved(_) => {}
        SaveOutcome::Skipped(reason) => println!("  {} nothing to save ({})", "·".dimmed(), reason),
        SaveOutcome::Failed(_) => {}
    }
}
