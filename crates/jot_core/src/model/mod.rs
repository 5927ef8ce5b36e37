//! Document model for workspace objects.
//!
//! # Responsibility
//! - Define the on-disk encoding of objects: YAML header plus Markdown body.
//! - Guarantee the marshal/unmarshal round trip normalizes, never corrupts.
//! - Support editing an object through an external tool without partial updates.
//!
//! # Invariants
//! - An object's class is fixed at construction.
//! - Decoding validates the whole header before any field is assigned.
//! - Tags are never absent; missing or null tags decode to an empty list.

mod error;
mod frontmatter;
mod journal;
mod meta;
mod mutate;
mod object;
mod thought;

pub use error::{DocumentError, DocumentResult, MutationStage, TransformError};
pub use journal::JournalEntry;
pub use meta::Meta;
pub use mutate::{
    editor_from_env, external_editor, MutationOutcome, SystemTempFiles, TempFileProvider,
    DEFAULT_TEMP_PREFIX,
};
pub use object::{object_id_from_path, Document, Object, ObjectClass, ObjectId};
pub use thought::{Thought, TO_REVIEW_BUCKET};
