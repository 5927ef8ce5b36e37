//! Document model error contracts.
//!
//! # Invariants
//! - Every variant except `Encode` is reachable from user-controlled input.
//! - A returned error always means the receiver kept its previous state.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;

pub type DocumentResult<T> = Result<T, DocumentError>;

/// Error produced by a caller-supplied mutate transform.
pub type TransformError = Box<dyn Error + Send + Sync + 'static>;

/// Step of the mutate protocol that touched the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationStage {
    CreateTempFile,
    WriteTempFile,
    ReadTempFile,
}

impl MutationStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreateTempFile => "create_temp_file",
            Self::WriteTempFile => "write_temp_file",
            Self::ReadTempFile => "read_temp_file",
        }
    }
}

#[derive(Debug)]
pub enum DocumentError {
    /// Structurally invalid input: empty buffer, bad separators, bad YAML.
    MalformedDocument(String),
    /// A recognized header field holds a value of the wrong type.
    FieldTypeMismatch {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    /// Header names a class outside the known variant set.
    UnknownClass(String),
    MutationIo {
        stage: MutationStage,
        source: io::Error,
    },
    /// The mutate transform failed; carried through untouched.
    Transform(TransformError),
    /// Header encoder failure. Internal, never caused by document content.
    Encode(serde_yaml::Error),
}

impl DocumentError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedDocument(message.into())
    }

    pub(crate) fn io(stage: MutationStage) -> impl FnOnce(io::Error) -> Self {
        move |source| Self::MutationIo { stage, source }
    }

    /// Stable short code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedDocument(_) => "malformed_document",
            Self::FieldTypeMismatch { .. } => "field_type_mismatch",
            Self::UnknownClass(_) => "unknown_class",
            Self::MutationIo { .. } => "mutation_io_failure",
            Self::Transform(_) => "transform_failure",
            Self::Encode(_) => "encode_failure",
        }
    }
}

impl Display for DocumentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedDocument(message) => write!(f, "malformed document: {message}"),
            Self::FieldTypeMismatch {
                field,
                expected,
                found,
            } => write!(
                f,
                "field `{field}` has wrong type: expected {expected}, found {found}"
            ),
            Self::UnknownClass(class) => write!(f, "unknown object class: {class}"),
            Self::MutationIo { stage, source } => {
                write!(f, "mutation failed at {}: {source}", stage.as_str())
            }
            Self::Transform(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode header: {err}"),
        }
    }
}

impl Error for DocumentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MutationIo { source, .. } => Some(source),
            Self::Transform(err) => Some(err.as_ref()),
            Self::Encode(err) => Some(err),
            Self::MalformedDocument(_) | Self::FieldTypeMismatch { .. } | Self::UnknownClass(_) => {
                None
            }
        }
    }
}

impl From<serde_yaml::Error> for DocumentError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::Encode(value)
    }
}
