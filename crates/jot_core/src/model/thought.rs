//! Thought objects: short captured notes that may wait for review.
//!
//! # Invariants
//! - `body` never ends with a line terminator after `unmarshal`.
//! - Header field order is `class`, `tags`, `pending_review`.
//! - Every header field is validated before any field is assigned.

use super::error::DocumentResult;
use super::frontmatter::{self, FrontMatter, RawDocument};
use super::meta::{Meta, MetaHeader, CLASS_FIELD, TAGS_FIELD};
use super::object::{Document, ObjectClass, ObjectId};
use log::debug;
use serde::Serialize;
use uuid::Uuid;

const PENDING_REVIEW_FIELD: &str = "pending_review";
const KNOWN_FIELDS: [&str; 3] = [CLASS_FIELD, TAGS_FIELD, PENDING_REVIEW_FIELD];

/// Bucket holding thoughts that still need review.
pub const TO_REVIEW_BUCKET: &str = "to_review";

/// Object of class `thought`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thought {
    id: ObjectId,
    /// Markdown after the header.
    pub body: String,
    pub pending_review: bool,
    pub meta: Meta,
}

#[derive(Serialize)]
struct EncodedHeader<'a> {
    class: &'a str,
    tags: &'a [String],
    pending_review: bool,
}

struct ThoughtHeader {
    meta: MetaHeader,
    pending_review: Option<bool>,
}

impl ThoughtHeader {
    fn decode(header: &FrontMatter) -> DocumentResult<Self> {
        Ok(Self {
            meta: MetaHeader::decode(header)?,
            pending_review: header.boolean(PENDING_REVIEW_FIELD)?,
        })
    }
}

impl Thought {
    /// Creates an empty thought with a fresh id.
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    /// Creates an empty thought with a caller-provided id.
    pub fn with_id(id: ObjectId) -> Self {
        Self {
            id,
            body: String::new(),
            pending_review: false,
            meta: Meta::new(ObjectClass::Thought),
        }
    }

    pub(crate) fn apply(&mut self, raw: &RawDocument<'_>) -> DocumentResult<()> {
        let header = ThoughtHeader::decode(&raw.header)?;
        log_unknown_fields(self.id, &raw.header);

        if let Some(pending_review) = header.pending_review {
            self.pending_review = pending_review;
        }
        self.body = raw.body.to_string();
        self.meta.update(header.meta);
        Ok(())
    }
}

impl Default for Thought {
    fn default() -> Self {
        Self::new()
    }
}

impl Document for Thought {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn meta(&self) -> &Meta {
        &self.meta
    }

    fn bucket(&self) -> Option<&'static str> {
        self.pending_review.then_some(TO_REVIEW_BUCKET)
    }

    fn marshal(&self) -> DocumentResult<Vec<u8>> {
        let header = EncodedHeader {
            class: self.meta.class().as_str(),
            tags: &self.meta.tags,
            pending_review: self.pending_review,
        };
        frontmatter::encode(&header, &self.body)
    }

    fn unmarshal(&mut self, bytes: &[u8]) -> DocumentResult<()> {
        let raw = frontmatter::decode(bytes)?;
        self.apply(&raw)
    }
}

fn log_unknown_fields(id: ObjectId, header: &FrontMatter) {
    let unknown = header.unknown_keys(&KNOWN_FIELDS);
    if !unknown.is_empty() {
        debug!(
            "event=header_unknown_fields module=model status=ok class=thought object_id={} fields={}",
            id,
            unknown.join(",")
        );
    }
}
