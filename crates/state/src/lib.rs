//! # Studio State
//!
//! The editing state engine behind Schema Studio.
//!
//! - [`history`]: bounded linear undo/redo over immutable snapshots
//! - [`autosave`]: debounced, change-detected, single-flight saving
//! - [`persist`]: the storage seam autosave writes through
//! - [`session`]: history and autosave composed for one open document
//! - [`config`]: editor settings loaded from TOML
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use studio_ir::{Edit, SchemaDocument};
//! use studio_state::{EditorConfig, EditorSession, MemoryPersister};
//!
//! let persister = Arc::new(MemoryPersister::new());
//! let mut session = EditorSession::open(SchemaDocument::new("Shop"), persister, &EditorConfig::default());
//! session.apply(&Edit::AddEntity { name: "Customer".into(), id: None })?;
//! session.undo();
//! session.close().await?;
//! ```

pub mod autosave;
pub mod config;
pub mod history;
pub mod persist;
pub mod session;

pub use autosave::{
    AutosaveCoordinator, AutosaveHandle, SaveEvent, SaveOutcome, SaveRecord, SkipReason,
};
pub use config::{AutosaveConfig, CONFIG_ENV_VAR, EditorConfig, HistoryConfig};
pub use history::{DEFAULT_MAX_HISTORY, History, PushOutcome, Transition};
pub use persist::{FilePersister, MemoryPersister, Persister, SavedDocument};
pub use session::EditorSession;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
