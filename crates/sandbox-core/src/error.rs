//! Error types for record decoding.
//!
//! Encoding never fails for a record built through the typed API, so every
//! variant here describes either a payload that does not satisfy a record's
//! schema or a misuse of the extension bag.

use std::fmt;

use thiserror::Error;

use crate::record::WireKind;

/// Result type alias for record operations.
pub type RecordResult<T> = Result<T, RecordError>;

/// What was found in place of the expected value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Found {
    /// The key was not present at all.
    Missing,
    /// The key held a value of the wrong JSON kind (including `null`).
    Kind(WireKind),
    /// The key held a string outside an enum's closed set.
    UnknownVariant(String),
}

impl fmt::Display for Found {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("missing"),
            Self::Kind(kind) => write!(f, "{kind}"),
            Self::UnknownVariant(value) => write!(f, "unknown variant \"{value}\""),
        }
    }
}

/// Errors raised while decoding or populating a record.
#[derive(Debug, Error)]
pub enum RecordError {
    /// A required field is absent, or a field holds the wrong kind of value.
    #[error("{record}: field '{field}' expected {expected}, found {found}")]
    SchemaViolation {
        /// Record type being decoded
        record: &'static str,
        /// Wire alias of the offending field (a path for nested items)
        field: String,
        /// Kind the schema requires
        expected: WireKind,
        /// What the payload actually held
        found: Found,
    },

    /// The payload is not a JSON object.
    #[error("{record}: payload must be a JSON object, found {found}")]
    MalformedPayload {
        /// Record type being decoded
        record: &'static str,
        /// Kind of the top-level value
        found: WireKind,
    },

    /// Input text is not JSON at all.
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A known wire alias was offered to the extension bag.
    #[error("{record}: '{alias}' is a known field and cannot be stored as an extension")]
    ExtensionShadowsField {
        /// Record type being populated
        record: &'static str,
        /// The colliding alias
        alias: String,
    },
}

impl RecordError {
    /// Whether this error is a schema violation.
    pub const fn is_schema_violation(&self) -> bool {
        matches!(self, Self::SchemaViolation { .. })
    }

    /// Wire path of the offending field, if the error names one.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::SchemaViolation { field, .. } => Some(field),
            Self::ExtensionShadowsField { alias, .. } => Some(alias),
            Self::MalformedPayload { .. } | Self::InvalidJson(_) => None,
        }
    }

    /// Re-root an error raised while decoding a nested element.
    ///
    /// `path` names the element inside the parent (e.g. `items[3]`). A
    /// non-object element becomes a schema violation on that path.
    pub(crate) fn nested(self, parent: &'static str, path: &str) -> Self {
        match self {
            Self::SchemaViolation {
                field,
                expected,
                found,
                ..
            } => Self::SchemaViolation {
                record: parent,
                field: format!("{path}.{field}"),
                expected,
                found,
            },
            Self::MalformedPayload { found, .. } => Self::SchemaViolation {
                record: parent,
                field: path.to_string(),
                expected: WireKind::Object,
                found: Found::Kind(found),
            },
            other => other,
        }
    }
}
