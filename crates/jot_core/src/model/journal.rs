//! Journal entries: dated free-form writing with no review state.

use super::error::DocumentResult;
use super::frontmatter::{self, RawDocument};
use super::meta::{Meta, MetaHeader, CLASS_FIELD, TAGS_FIELD};
use super::object::{Document, ObjectClass, ObjectId};
use log::debug;
use serde::Serialize;
use uuid::Uuid;

/// Object of class `journal-entry`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntry {
    id: ObjectId,
    pub body: String,
    pub meta: Meta,
}

#[derive(Serialize)]
struct EncodedHeader<'a> {
    class: &'a str,
    tags: &'a [String],
}

impl JournalEntry {
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    pub fn with_id(id: ObjectId) -> Self {
        Self {
            id,
            body: String::new(),
            meta: Meta::new(ObjectClass::JournalEntry),
        }
    }

    pub(crate) fn apply(&mut self, raw: &RawDocument<'_>) -> DocumentResult<()> {
        let header = MetaHeader::decode(&raw.header)?;
        let unknown = raw.header.unknown_keys(&[CLASS_FIELD, TAGS_FIELD]);
        if !unknown.is_empty() {
            debug!(
                "event=header_unknown_fields module=model status=ok class=journal-entry object_id={} fields={}",
                self.id,
                unknown.join(",")
            );
        }

        self.body = raw.body.to_string();
        self.meta.update(header);
        Ok(())
    }
}

impl Default for JournalEntry {
    fn default() -> Self {
        Self::new()
    }
}

impl Document for JournalEntry {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn meta(&self) -> &Meta {
        &self.meta
    }

    fn bucket(&self) -> Option<&'static str> {
        None
    }

    fn marshal(&self) -> DocumentResult<Vec<u8>> {
        let header = EncodedHeader {
            class: self.meta.class().as_str(),
            tags: &self.meta.tags,
        };
        frontmatter::encode(&header, &self.body)
    }

    fn unmarshal(&mut self, bytes: &[u8]) -> DocumentResult<()> {
        let raw = frontmatter::decode(bytes)?;
        self.apply(&raw)
    }
}
