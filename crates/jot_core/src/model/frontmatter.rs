//! Frontmatter codec shared by every object class.
//!
//! # Responsibility
//! - Split a raw buffer into header and body at the `---` separator lines.
//! - Expose header fields through typed accessors that reject wrong types.
//! - Encode a typed header plus body into the canonical byte layout.
//!
//! # Invariants
//! - Decoding never partially succeeds: callers get a full `RawDocument` or an error.
//! - Encoded output is `---\n` + header + `---\n` + body, plus `\n` only when
//!   the body is non-empty.

use super::error::{DocumentError, DocumentResult};
use serde::Serialize;
use serde_yaml::{Mapping, Value};

pub(crate) const SEPARATOR: &str = "---";

/// Decoded but not yet validated document.
#[derive(Debug)]
pub(crate) struct RawDocument<'a> {
    pub header: FrontMatter,
    pub body: &'a str,
}

/// Loosely-typed header mapping. Field access goes through typed getters only.
#[derive(Debug, Default)]
pub(crate) struct FrontMatter {
    fields: Mapping,
}

impl FrontMatter {
    pub fn string(&self, field: &'static str) -> DocumentResult<Option<String>> {
        match self.fields.get(field) {
            None => Ok(None),
            Some(Value::String(value)) => Ok(Some(value.clone())),
            Some(other) => Err(mismatch(field, "string", other)),
        }
    }

    pub fn boolean(&self, field: &'static str) -> DocumentResult<Option<bool>> {
        match self.fields.get(field) {
            None => Ok(None),
            Some(Value::Bool(value)) => Ok(Some(*value)),
            Some(other) => Err(mismatch(field, "boolean", other)),
        }
    }

    /// Reads a string sequence. An explicit `null` reads as an empty list.
    pub fn string_list(&self, field: &'static str) -> DocumentResult<Option<Vec<String>>> {
        match self.fields.get(field) {
            None => Ok(None),
            Some(Value::Null) => Ok(Some(Vec::new())),
            Some(Value::Sequence(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(value) => Ok(value.clone()),
                    other => Err(mismatch(field, "sequence of strings", other)),
                })
                .collect::<DocumentResult<Vec<_>>>()
                .map(Some),
            Some(other) => Err(mismatch(field, "sequence of strings", other)),
        }
    }

    /// Keys present in the header but absent from `known`.
    pub fn unknown_keys(&self, known: &[&str]) -> Vec<String> {
        self.fields
            .iter()
            .filter_map(|(key, _)| match key {
                Value::String(name) if known.contains(&name.as_str()) => None,
                Value::String(name) => Some(name.clone()),
                other => Some(format!("<{}>", value_kind(other))),
            })
            .collect()
    }
}

/// Splits and parses `bytes` into a header mapping and body.
///
/// The body is returned with trailing line terminators removed.
pub(crate) fn decode(bytes: &[u8]) -> DocumentResult<RawDocument<'_>> {
    if bytes.is_empty() {
        return Err(DocumentError::malformed("document is empty"));
    }
    let text = std::str::from_utf8(bytes).map_err(|err| {
        DocumentError::malformed(format!("document is not valid UTF-8: {err}"))
    })?;

    let (header, body) = split(text)?;
    let fields = parse_header(header)?;
    Ok(RawDocument {
        header: FrontMatter { fields },
        body: body.trim_end_matches(['\n', '\r']),
    })
}

/// Renders `header` and `body` into the canonical document layout.
pub(crate) fn encode<H: Serialize>(header: &H, body: &str) -> DocumentResult<Vec<u8>> {
    let encoded = serde_yaml::to_string(header)?;

    let mut out = String::with_capacity(encoded.len() + body.len() + 2 * SEPARATOR.len() + 3);
    out.push_str(SEPARATOR);
    out.push('\n');
    out.push_str(&encoded);
    out.push_str(SEPARATOR);
    out.push('\n');
    out.push_str(body);
    // An empty body already ends on the separator's newline.
    if !body.is_empty() {
        out.push('\n');
    }
    Ok(out.into_bytes())
}

fn split(text: &str) -> DocumentResult<(&str, &str)> {
    let rest = strip_separator_line(text).ok_or_else(|| {
        DocumentError::malformed("document must start with a `---` separator line")
    })?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\n', '\r']) == SEPARATOR {
            return Ok((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    Err(DocumentError::malformed(
        "closing `---` separator line is missing",
    ))
}

fn strip_separator_line(text: &str) -> Option<&str> {
    let rest = text.strip_prefix(SEPARATOR)?;
    rest.strip_prefix('\n')
        .or_else(|| rest.strip_prefix("\r\n"))
}

fn parse_header(header: &str) -> DocumentResult<Mapping> {
    if header.trim().is_empty() {
        return Ok(Mapping::new());
    }
    let value: Value = serde_yaml::from_str(header).map_err(|err| {
        DocumentError::malformed(format!("header is not valid YAML: {err}"))
    })?;
    match value {
        Value::Null => Ok(Mapping::new()),
        Value::Mapping(fields) => Ok(fields),
        other => Err(DocumentError::malformed(format!(
            "header must be a key-value mapping, found {}",
            value_kind(&other)
        ))),
    }
}

fn mismatch(field: &'static str, expected: &'static str, found: &Value) -> DocumentError {
    DocumentError::FieldTypeMismatch {
        field,
        expected,
        found: value_kind(found),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::{decode, encode};
    use crate::model::error::DocumentError;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Header<'a> {
        class: &'a str,
        tags: &'a [String],
    }

    #[test]
    fn decode_splits_header_and_trims_body() {
        let raw = decode(b"---\nclass: thought\n---\nline one\nline two\n\n\n").unwrap();
        assert_eq!(raw.body, "line one\nline two");
        assert_eq!(raw.header.string("class").unwrap().as_deref(), Some("thought"));
    }

    #[test]
    fn decode_accepts_crlf_separators() {
        let raw = decode(b"---\r\nclass: thought\r\n---\r\nbody\r\n").unwrap();
        assert_eq!(raw.body, "body");
    }

    #[test]
    fn decode_treats_empty_header_as_empty_mapping() {
        let raw = decode(b"---\n---\nbody").unwrap();
        assert_eq!(raw.header.string("class").unwrap(), None);
        assert!(raw.header.unknown_keys(&[]).is_empty());
    }

    #[test]
    fn decode_only_splits_on_first_closing_separator() {
        let raw = decode(b"---\nclass: thought\n---\nabove\n---\nbelow\n").unwrap();
        assert_eq!(raw.body, "above\n---\nbelow");
    }

    #[test]
    fn decode_rejects_missing_or_misplaced_separator() {
        let inputs: [&[u8]; 5] = [
            b"",
            b"class: thought\n---\nbody",
            b"\n---\nclass: thought\n---\n",
            b"---\nclass: thought\nbody",
            b"--- \nclass: thought\n---\n",
        ];
        for input in inputs {
            let err = decode(input).unwrap_err();
            assert!(
                matches!(err, DocumentError::MalformedDocument(_)),
                "unexpected error for {input:?}: {err}"
            );
        }
    }

    #[test]
    fn decode_rejects_non_mapping_header() {
        let err = decode(b"---\n- a\n- b\n---\n").unwrap_err();
        assert!(err.to_string().contains("found sequence"), "{err}");
    }

    #[test]
    fn typed_getters_reject_wrong_types() {
        let raw = decode(b"---\nclass: 7\ntags: [a, 1]\npending_review: \"no\"\n---\n").unwrap();

        let err = raw.header.string("class").unwrap_err();
        assert_eq!(err.to_string(), "field `class` has wrong type: expected string, found number");
        assert!(matches!(
            raw.header.string_list("tags").unwrap_err(),
            DocumentError::FieldTypeMismatch { field: "tags", .. }
        ));
        assert!(matches!(
            raw.header.boolean("pending_review").unwrap_err(),
            DocumentError::FieldTypeMismatch {
                field: "pending_review",
                found: "string",
                ..
            }
        ));
    }

    #[test]
    fn unknown_keys_lists_unrecognized_fields() {
        let raw = decode(b"---\nclass: thought\nmood: calm\n---\n").unwrap();
        assert_eq!(raw.header.unknown_keys(&["class"]), vec!["mood".to_string()]);
    }

    #[test]
    fn encode_adds_trailing_newline_only_for_non_empty_body() {
        let tags = vec!["x".to_string()];
        let header = Header {
            class: "thought",
            tags: &tags,
        };
        assert_eq!(
            String::from_utf8(encode(&header, "").unwrap()).unwrap(),
            "---\nclass: thought\ntags:\n- x\n---\n"
        );
        assert_eq!(
            String::from_utf8(encode(&header, "body").unwrap()).unwrap(),
            "---\nclass: thought\ntags:\n- x\n---\nbody\n"
        );
    }
}
