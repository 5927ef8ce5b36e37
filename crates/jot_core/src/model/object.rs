//! Common capability for storable objects and the closed set of classes.
//!
//! # Responsibility
//! - Define `Document`, the interface every object class implements.
//! - Map class names to concrete variants when reading unknown files.
//! - Derive workspace-relative storage paths from object state.
//!
//! # Invariants
//! - An object's class never changes after construction.
//! - `relative_path` is `<class dir>/[<bucket>/]<id>.md`.

use super::error::{DocumentError, DocumentResult, TransformError};
use super::frontmatter::{self, RawDocument};
use super::journal::JournalEntry;
use super::meta::{Meta, CLASS_FIELD};
use super::mutate::{self, MutationOutcome, SystemTempFiles, TempFileProvider};
use super::thought::Thought;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Opaque object identifier. Assigned on creation, never by the codec.
pub type ObjectId = Uuid;

const DOCUMENT_EXTENSION: &str = "md";

/// Every class an object may belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectClass {
    Thought,
    JournalEntry,
}

impl ObjectClass {
    pub const ALL: [ObjectClass; 2] = [ObjectClass::Thought, ObjectClass::JournalEntry];

    /// Name written to the `class` header field.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Thought => "thought",
            Self::JournalEntry => "journal-entry",
        }
    }

    /// Top-level workspace directory for objects of this class.
    pub fn storage_dir(self) -> &'static str {
        match self {
            Self::Thought => "thoughts",
            Self::JournalEntry => "journal",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|class| class.as_str() == value.trim())
    }
}

impl Display for ObjectClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability shared by every storable object.
pub trait Document {
    fn id(&self) -> ObjectId;

    fn meta(&self) -> &Meta;

    /// Storage bucket under the class directory, or `None` for the default.
    fn bucket(&self) -> Option<&'static str>;

    /// Encodes the object into its canonical on-disk bytes.
    fn marshal(&self) -> DocumentResult<Vec<u8>>;

    /// Replaces the object's state with the decoded contents of `bytes`.
    ///
    /// # Errors
    /// - `MalformedDocument` for structural problems.
    /// - `FieldTypeMismatch` when a known header field has the wrong type.
    ///
    /// On error no field of the object is modified.
    fn unmarshal(&mut self, bytes: &[u8]) -> DocumentResult<()>;

    fn class(&self) -> ObjectClass {
        self.meta().class()
    }

    fn relative_path(&self) -> PathBuf {
        let mut path = PathBuf::from(self.class().storage_dir());
        if let Some(bucket) = self.bucket() {
            path.push(bucket);
        }
        path.push(format!("{}.{DOCUMENT_EXTENSION}", self.id()));
        path
    }

    /// Round-trips the object through a system temp file and `transform`.
    ///
    /// See [`Document::mutate_with`].
    fn mutate<F>(&mut self, transform: F) -> DocumentResult<MutationOutcome>
    where
        Self: Sized,
        F: FnOnce(&Path) -> Result<(), TransformError>,
    {
        self.mutate_with(&SystemTempFiles::default(), transform)
    }

    /// Writes the object to a temp file from `provider`, lets `transform`
    /// rewrite it, then reads the result back.
    ///
    /// # Contract
    /// - The object changes only if every step succeeds.
    /// - The temp file is removed on every exit path.
    /// - Transform errors are returned as `DocumentError::Transform`.
    fn mutate_with<F>(
        &mut self,
        provider: &dyn TempFileProvider,
        transform: F,
    ) -> DocumentResult<MutationOutcome>
    where
        Self: Sized,
        F: FnOnce(&Path) -> Result<(), TransformError>,
    {
        mutate::run(self, provider, transform)
    }
}

/// Closed set of object variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
    Thought(Thought),
    JournalEntry(JournalEntry),
}

impl Object {
    /// Creates an empty object of `class`.
    pub fn empty(class: ObjectClass, id: ObjectId) -> Self {
        match class {
            ObjectClass::Thought => Self::Thought(Thought::with_id(id)),
            ObjectClass::JournalEntry => Self::JournalEntry(JournalEntry::with_id(id)),
        }
    }

    /// Decodes a file of any known class.
    ///
    /// # Errors
    /// - `MalformedDocument` when the header has no `class`.
    /// - `UnknownClass` when `class` names no known variant.
    /// - Any error from the variant's own decoding.
    pub fn decode(id: ObjectId, bytes: &[u8]) -> DocumentResult<Self> {
        let raw = frontmatter::decode(bytes)?;
        let name = raw
            .header
            .string(CLASS_FIELD)?
            .ok_or_else(|| DocumentError::malformed("header is missing `class`"))?;
        let class = ObjectClass::parse(&name).ok_or(DocumentError::UnknownClass(name))?;

        let mut object = Self::empty(class, id);
        object.apply(&raw)?;
        Ok(object)
    }

    pub fn as_thought(&self) -> Option<&Thought> {
        match self {
            Self::Thought(thought) => Some(thought),
            Self::JournalEntry(_) => None,
        }
    }

    pub fn as_journal_entry(&self) -> Option<&JournalEntry> {
        match self {
            Self::JournalEntry(entry) => Some(entry),
            Self::Thought(_) => None,
        }
    }

    fn apply(&mut self, raw: &RawDocument<'_>) -> DocumentResult<()> {
        match self {
            Self::Thought(thought) => thought.apply(raw),
            Self::JournalEntry(entry) => entry.apply(raw),
        }
    }
}

impl From<Thought> for Object {
    fn from(value: Thought) -> Self {
        Self::Thought(value)
    }
}

impl From<JournalEntry> for Object {
    fn from(value: JournalEntry) -> Self {
        Self::JournalEntry(value)
    }
}

impl Document for Object {
    fn id(&self) -> ObjectId {
        match self {
            Self::Thought(thought) => thought.id(),
            Self::JournalEntry(entry) => entry.id(),
        }
    }

    fn meta(&self) -> &Meta {
        match self {
            Self::Thought(thought) => thought.meta(),
            Self::JournalEntry(entry) => entry.meta(),
        }
    }

    fn bucket(&self) -> Option<&'static str> {
        match self {
            Self::Thought(thought) => thought.bucket(),
            Self::JournalEntry(entry) => entry.bucket(),
        }
    }

    fn marshal(&self) -> DocumentResult<Vec<u8>> {
        match self {
            Self::Thought(thought) => thought.marshal(),
            Self::JournalEntry(entry) => entry.marshal(),
        }
    }

    fn unmarshal(&mut self, bytes: &[u8]) -> DocumentResult<()> {
        let raw = frontmatter::decode(bytes)?;
        self.apply(&raw)
    }
}

/// Extracts the object id from a `<uuid>.md` storage path.
pub fn object_id_from_path(path: &Path) -> Option<ObjectId> {
    if path.extension()? != DOCUMENT_EXTENSION {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    // Only the hyphenated form is used on disk.
    if stem.len() != 36 {
        return None;
    }
    Uuid::parse_str(stem).ok()
}
