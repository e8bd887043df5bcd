//! Command implementations

use crate::output;
use crate::script::{ScriptStep, load_script};
use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use studio_ir::serialization::{default_file_name, ensure_extension};
use studio_ir::{SchemaDocument, Validator, load_schema, save_schema, signature};
use studio_state::{EditorConfig, EditorSession, FilePersister, SaveEvent};
use tokio::sync::broadcast;
use tracing::{debug, info};

// ============================================================================
// new
// ============================================================================

pub fn new_schema(
    name: &str,
    description: Option<String>,
    output: Option<PathBuf>,
    force: bool,
) -> Result<()> {
    let path = ensure_extension(output.unwrap_or_else(|| PathBuf::from(default_file_name(name))));
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    let mut doc = SchemaDocument::new(name);
    if let Some(description) = description {
        doc = doc.with_description(description);
    }
    save_schema(&doc, &path).with_context(|| format!("Failed to write {}", path.display()))?;

    info!(path = %path.display(), "schema created");
    output::success(format!("Created schema '{}' at {}", name, path.display()));
    Ok(())
}

// ============================================================================
// info
// ============================================================================

pub fn info(file: &Path) -> Result<()> {
    let doc = open(file)?;
    let sig = signature(&doc)?;

    output::heading(&doc.name);
    if !doc.description.is_empty() {
        println!("  {}", doc.description);
    }
    output::field("Schema ID", doc.schema_id.as_deref().unwrap_or("(not saved)"));
    output::field("Entities", doc.entity_count());
    output::field("Fields", doc.field_count());
    output::field("Relationships", doc.relationship_count());
    output::field("Signature", format!("{} bytes", sig.len()));
    if let Some(at) = doc.last_modified {
        output::field("Last modified", at.to_rfc3339());
    }

    for entity in &doc.entities {
        println!("  - {} ({} fields)", entity.name, entity.field_count());
    }
    for rel in &doc.relationships {
        let name_of = |id: &str| {
            doc.entity(id)
                .map(|e| e.name.clone())
                .unwrap_or_else(|| id.to_string())
        };
        println!(
            "  {} {} {}",
            name_of(&rel.from_entity),
            rel.relation_type.arrow_symbol(),
            name_of(&rel.to_entity)
        );
    }
    Ok(())
}

// ============================================================================
// validate
// ============================================================================

pub fn validate(file: &Path) -> Result<()> {
    let doc = open(file)?;
    let result = Validator::with_default_rules().validate(&doc);

    for warning in &result.warnings {
        output::warning(warning.to_string());
    }
    for error in &result.errors {
        output::failure(error.to_string());
    }

    if result.has_errors() {
        bail!(
            "{} has {} validation error(s)",
            file.display(),
            result.errors.len()
        );
    }
    output::success(format!(
        "{} is valid ({} warning(s))",
        file.display(),
        result.warnings.len()
    ));
    Ok(())
}

// ============================================================================
// signature
// ============================================================================

pub fn print_signature(file: &Path) -> Result<()> {
    let doc = open(file)?;
    println!("{}", signature(&doc)?);
    Ok(())
}

// ============================================================================
// replay
// ============================================================================

/// Overrides applied on top of the loaded config
#[derive(Debug, Clone, Default)]
pub struct ReplayOptions {
    pub config: Option<PathBuf>,
    pub delay_ms: Option<u64>,
    pub max_history: Option<usize>,
    pub no_autosave: bool,
}

impl ReplayOptions {
    /// Resolve the effective editor config
    pub fn editor_config(&self) -> Result<EditorConfig> {
        let mut config = EditorConfig::discover(self.config.as_deref())?;
        if let Some(delay_ms) = self.delay_ms {
            config = config.with_autosave_delay(delay_ms);
        }
        if let Some(max_history) = self.max_history {
            config = config.with_max_history(max_history);
        }
        if self.no_autosave {
            config = config.with_autosave_enabled(false);
        }
        config.validate()?;
        Ok(config)
    }
}

pub async fn replay(file: &Path, script: &Path, options: &ReplayOptions) -> Result<()> {
    let config = options.editor_config()?;
    let steps = load_script(script)?;
    let doc = open(file)?;
    debug!(?config, steps = steps.len(), "replay starting");

    let persister = Arc::new(FilePersister::new(file));
    let mut session = EditorSession::open(doc, persister, &config);
    let mut events = session.subscribe();

    output::heading(format!("Replaying {} step(s)", steps.len()));
    for (index, step) in steps.iter().enumerate() {
        println!("{:>3}. {}", index + 1, step.describe());
        match step {
            ScriptStep::Edit { edit } => match session.apply(edit) {
                Ok(true) => {}
                Ok(false) => println!("     no change"),
                Err(e) => output::failure(format!("Edit rejected: {}", e)),
            },
            ScriptStep::Undo => {
                if session.undo().is_none() {
                    println!("     nothing to undo");
                }
            }
            ScriptStep::Redo => {
                if session.redo().is_none() {
                    println!("     nothing to redo");
                }
            }
            ScriptStep::Wait { ms } => tokio::time::sleep(Duration::from_millis(*ms)).await,
            ScriptStep::Flush => output::save_outcome(&session.flush().await?),
        }
        drain(&mut events);
    }

    let history_len = session.history().len();
    let cursor = session.history().cursor();
    let (can_undo, can_redo) = (session.can_undo(), session.can_redo());
    let current = session.current();

    let outcome = session.close().await?;
    drain(&mut events);
    output::save_outcome(&outcome);

    output::heading("Final state");
    output::field("Name", &current.name);
    output::field("Entities", current.entity_count());
    output::field("Relationships", current.relationship_count());
    output::field("History", format!("{} entries, cursor {}", history_len, cursor));
    output::field("Can undo", output::yes_no(can_undo));
    output::field("Can redo", output::yes_no(can_redo));
    Ok(())
}

fn drain(events: &mut broadcast::Receiver<SaveEvent>) {
    loop {
        match events.try_recv() {
            Ok(event) => {
                debug!(event = event.label(), "save notification");
                output::save_event(&event)
            }
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                output::warning(format!("{} notification(s) dropped", skipped))
            }
            Err(_) => break,
        }
    }
}

fn open(file: &Path) -> Result<SchemaDocument> {
    load_schema(file).with_context(|| format!("Failed to open {}", file.display()))
}

// ============================================================================
// Tests
// ============================================================================
