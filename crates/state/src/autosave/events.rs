//! Save notifications

use crate::persist::SavedDocument;
use chrono::{DateTime, Utc};

/// Capacity of the notification channel; slow subscribers lag past this
pub const EVENT_CAPACITY: usize = 64;

/// Observable autosave signal
#[derive(Debug, Clone, PartialEq)]
pub enum SaveEvent {
    /// A persist call was issued
    Started,

    /// The persist call completed
    Succeeded {
        at: DateTime<Utc>,
        saved: SavedDocument,
    },

    /// The persist call failed; the content will be retried on the next
    /// debounce cycle
    Failed { error: String },
}

impl SaveEvent {
    /// Short label for display
    pub fn label(&self) -> &'static str {
        match self {
            SaveEvent::Started => "started",
            SaveEvent::Succeeded { .. } => "succeeded",
            SaveEvent::Failed { .. } => "failed",
        }
    }
}
