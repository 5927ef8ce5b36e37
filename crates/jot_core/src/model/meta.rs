//! Attributes shared by every storable object.

use super::error::DocumentResult;
use super::frontmatter::FrontMatter;
use super::object::ObjectClass;
use log::warn;

pub(crate) const CLASS_FIELD: &str = "class";
pub(crate) const TAGS_FIELD: &str = "tags";

/// Shared object attributes: fixed class plus ordered tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meta {
    class: ObjectClass,
    /// Insertion-ordered; never absent, empty when the header had none.
    pub tags: Vec<String>,
}

impl Meta {
    pub fn new(class: ObjectClass) -> Self {
        Self {
            class,
            tags: Vec::new(),
        }
    }

    pub fn class(&self) -> ObjectClass {
        self.class
    }

    /// Appends `tag` unless already present. Returns whether it was added.
    pub fn add_tag(&mut self, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        if self.tags.contains(&tag) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    /// Removes `tag` if present. Returns whether it was removed.
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|existing| existing != tag);
        self.tags.len() != before
    }

    /// Applies a validated header.
    ///
    /// A differing `class` is logged and ignored; missing or null tags clear
    /// the tag list.
    pub(crate) fn update(&mut self, header: MetaHeader) {
        if let Some(class) = header.class {
            if class != self.class.as_str() {
                warn!(
                    "event=class_change_rejected module=model status=warn from={} to={}",
                    self.class, class
                );
            }
        }
        self.tags = header.tags.unwrap_or_default();
    }
}

/// Typed view of the `Meta` header fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MetaHeader {
    pub class: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl MetaHeader {
    pub fn decode(header: &FrontMatter) -> DocumentResult<Self> {
        Ok(Self {
            class: header.string(CLASS_FIELD)?,
            tags: header.string_list(TAGS_FIELD)?,
        })
    }
}
