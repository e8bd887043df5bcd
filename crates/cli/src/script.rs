//! Replay scripts
//!
//! A script is a JSON array of steps run against an editor session:
//!
//! ```json
//! [
//!   { "step": "edit", "edit": { "op": "add_entity", "name": "Customer" } },
//!   { "step": "undo" },
//!   { "step": "wait", "ms": 2500 },
//!   { "step": "flush" }
//! ]
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use studio_ir::Edit;

/// One step of a replay script
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ScriptStep {
    /// Apply an edit
    Edit { edit: Edit },
    /// Undo the last change
    Undo,
    /// Redo the last undone change
    Redo,
    /// Let time pass so the autosave timer can fire
    Wait { ms: u64 },
    /// Save now if the document changed
    Flush,
}

impl ScriptStep {
    /// Short description for output
    pub fn describe(&self) -> String {
        match self {
            ScriptStep::Edit { edit } => format!("edit {}", edit.label()),
            ScriptStep::Undo => "undo".to_string(),
            ScriptStep::Redo => "redo".to_string(),
            ScriptStep::Wait { ms } => format!("wait {}ms", ms),
            ScriptStep::Flush => "flush".to_string(),
        }
    }
}

/// Parse a script from JSON text
pub fn parse_script(json: &str) -> Result<Vec<ScriptStep>> {
    serde_json::from_str(json).context("Invalid replay script")
}

/// Read and parse a script file
pub fn load_script(path: &Path) -> Result<Vec<ScriptStep>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    parse_script(&json)
}
