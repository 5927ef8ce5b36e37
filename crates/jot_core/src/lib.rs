//! Core domain logic for jot.
//!
//! Two independent engines live here: the document model (objects stored as
//! YAML-headed Markdown files, edited through external tools) and the action
//! queue (deferred work that may expand into follow-up work).

pub mod config;
pub mod logging;
pub mod model;
pub mod queue;

pub use config::{ConfigError, CoreConfig, LogLevel};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::{
    Document, DocumentError, DocumentResult, JournalEntry, Meta, MutationOutcome, Object,
    ObjectClass, ObjectId, SystemTempFiles, TempFileProvider, Thought,
};
pub use queue::{
    Action, ActionError, ActionOutcome, ActionQueue, BoxedAction, Discipline, DrainReport,
    Fifo, FnAction, HighestPriority, Lifo, QueueError, QueueResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
