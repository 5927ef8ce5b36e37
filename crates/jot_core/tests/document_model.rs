use jot_core::{Document, DocumentError, JournalEntry, Object, ObjectClass, Thought};
use pretty_assertions::assert_eq;
use std::path::PathBuf;
use uuid::Uuid;

fn marshal_string(document: &impl Document) -> String {
    String::from_utf8(document.marshal().unwrap()).unwrap()
}

#[test]
fn thought_new_sets_defaults() {
    let thought = Thought::new();

    assert!(!thought.id().is_nil());
    assert_eq!(thought.class(), ObjectClass::Thought);
    assert!(thought.meta.tags.is_empty());
    assert!(!thought.pending_review);
    assert_eq!(thought.body, "");
}

#[test]
fn marshal_uses_canonical_layout() {
    let mut thought = Thought::new();
    thought.body = "# blah blah".to_string();

    assert_eq!(
        marshal_string(&thought),
        "---\nclass: thought\ntags: []\npending_review: false\n---\n# blah blah\n"
    );
}

#[test]
fn marshal_then_unmarshal_preserves_fields() {
    let mut original = Thought::new();
    original.body = "first line\n\nsecond paragraph".to_string();
    original.pending_review = true;
    original.meta.tags = vec!["zeta".to_string(), "alpha".to_string()];

    let mut decoded = Thought::with_id(original.id());
    decoded.unmarshal(&original.marshal().unwrap()).unwrap();

    assert_eq!(decoded, original);
}

#[test]
fn empty_body_marshals_without_extra_newline() {
    let thought = Thought::new();
    let encoded = marshal_string(&thought);
    assert_eq!(
        encoded,
        "---\nclass: thought\ntags: []\npending_review: false\n---\n"
    );

    let mut decoded = Thought::new();
    decoded.body = "stale".to_string();
    decoded.unmarshal(encoded.as_bytes()).unwrap();
    assert_eq!(decoded.body, "");
}

#[test]
fn unmarshal_reads_null_tags_as_empty() {
    let mut thought = Thought::new();
    thought.meta.tags = vec!["stale".to_string()];
    thought
        .unmarshal(b"---\nclass: thought\ntags:\n---\n# blah blah")
        .unwrap();

    assert_eq!(thought.class(), ObjectClass::Thought);
    assert!(thought.meta.tags.is_empty());
    assert_eq!(thought.body, "# blah blah");
}

#[test]
fn unmarshal_keeps_tag_order() {
    let mut thought = Thought::new();
    thought
        .unmarshal(b"---\nclass: thought\ntags: [foo, bar]\npending_review: true\n---\nbody\n")
        .unwrap();

    assert_eq!(thought.meta.tags, vec!["foo".to_string(), "bar".to_string()]);
    assert!(thought.pending_review);
}

#[test]
fn unmarshal_normalizes_header_whitespace_and_trailing_lines() {
    let mut thought = Thought::new();
    thought
        .unmarshal(b"---\nclass:   thought\ntags: [ a ,b ]\npending_review:  true\n---\n\nbody\n\n\n")
        .unwrap();
    assert_eq!(thought.body, "\nbody");

    let canonical = marshal_string(&thought);
    assert_eq!(
        canonical,
        "---\nclass: thought\ntags:\n- a\n- b\npending_review: true\n---\n\nbody\n"
    );

    let mut again = Thought::with_id(thought.id());
    again.unmarshal(canonical.as_bytes()).unwrap();
    assert_eq!(marshal_string(&again), canonical);
}

#[test]
fn unmarshal_ignores_class_change() {
    let mut thought = Thought::new();
    thought
        .unmarshal(b"---\nclass: journal-entry\ntags: [moved]\n---\ntext\n")
        .unwrap();

    assert_eq!(thought.class(), ObjectClass::Thought);
    assert_eq!(thought.meta.tags, vec!["moved".to_string()]);
    assert!(marshal_string(&thought).starts_with("---\nclass: thought\n"));
}

#[test]
fn unmarshal_rejects_malformed_documents() {
    let inputs: [&[u8]; 5] = [
        b"",
        b"# no header at all\n",
        b"---\nclass: thought\n# never closed\n",
        b"---\nclass: [unclosed\n---\nbody\n",
        b"---\njust a scalar\n---\nbody\n",
    ];
    for input in inputs {
        let mut thought = Thought::new();
        let err = thought.unmarshal(input).unwrap_err();
        assert!(
            matches!(err, DocumentError::MalformedDocument(_)),
            "unexpected error for {:?}: {err}",
            String::from_utf8_lossy(input)
        );
    }
}

#[test]
fn unmarshal_rejects_wrong_field_types() {
    let cases: [(&[u8], &str); 4] = [
        (b"---\nclass: 5\n---\n", "class"),
        (b"---\nclass: thought\ntags: foo\n---\n", "tags"),
        (b"---\nclass: thought\ntags: [ok, [nested]]\n---\n", "tags"),
        (b"---\nclass: thought\npending_review: maybe\n---\n", "pending_review"),
    ];
    for (input, expected_field) in cases {
        let mut thought = Thought::new();
        match thought.unmarshal(input).unwrap_err() {
            DocumentError::FieldTypeMismatch { field, .. } => assert_eq!(field, expected_field),
            other => panic!("unexpected error: {other}"),
        }
    }
}

#[test]
fn failed_unmarshal_leaves_object_untouched() {
    let mut thought = Thought::new();
    thought.body = "keep me".to_string();
    thought.pending_review = true;
    thought.meta.tags = vec!["keep".to_string()];
    let before = thought.clone();

    thought
        .unmarshal(b"---\nclass: thought\ntags: [new]\npending_review: false\nbroken: [\n---\nnew body\n")
        .unwrap_err();
    thought
        .unmarshal(b"---\nclass: thought\ntags: [new]\npending_review: 0\n---\nnew body\n")
        .unwrap_err();

    assert_eq!(thought, before);
}

#[test]
fn journal_entry_marshals_without_review_field() {
    let mut entry = JournalEntry::new();
    entry.body = "Dear diary".to_string();
    entry.meta.add_tag("evening");

    assert_eq!(
        marshal_string(&entry),
        "---\nclass: journal-entry\ntags:\n- evening\n---\nDear diary\n"
    );
    assert_eq!(entry.bucket(), None);
}

#[test]
fn object_decode_dispatches_on_class() {
    let id = Uuid::new_v4();

    let thought = Object::decode(id, b"---\nclass: thought\ntags: []\npending_review: true\n---\nidea\n")
        .unwrap();
    let decoded = thought.as_thought().expect("thought variant");
    assert_eq!(decoded.id(), id);
    assert!(decoded.pending_review);
    assert_eq!(decoded.body, "idea");

    let entry = Object::decode(id, b"---\nclass: journal-entry\ntags: [a]\n---\ntoday\n").unwrap();
    assert_eq!(entry.class(), ObjectClass::JournalEntry);
    assert_eq!(entry.as_journal_entry().unwrap().body, "today");
}

#[test]
fn object_decode_requires_known_class() {
    let id = Uuid::new_v4();

    let err = Object::decode(id, b"---\nclass: recipe\n---\n").unwrap_err();
    assert!(matches!(err, DocumentError::UnknownClass(ref class) if class == "recipe"));

    let err = Object::decode(id, b"---\ntags: []\n---\n").unwrap_err();
    assert!(matches!(err, DocumentError::MalformedDocument(_)));
}

#[test]
fn relative_path_includes_bucket() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();

    let mut thought = Thought::with_id(id);
    assert_eq!(
        thought.relative_path(),
        PathBuf::from("thoughts/11111111-2222-4333-8444-555555555555.md")
    );
    thought.pending_review = true;
    assert_eq!(
        thought.relative_path(),
        PathBuf::from("thoughts/to_review/11111111-2222-4333-8444-555555555555.md")
    );

    let entry = Object::from(JournalEntry::with_id(id));
    assert_eq!(
        entry.relative_path(),
        PathBuf::from("journal/11111111-2222-4333-8444-555555555555.md")
    );
}
