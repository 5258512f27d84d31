//! The wire record contract shared by every API model.
//!
//! A record type declares a static alias table ([`WireRecord::FIELDS`]) and
//! implements [`WireRecord::decode_object`] / [`WireRecord::encode_object`]
//! on top of [`ObjectReader`] and [`ObjectWriter`]. The table is the single
//! source of truth for which keys are known; everything else in a payload is
//! an extension field and is carried through untouched.
//!
//! # Presence
//!
//! Nullable fields are held as `Option<Option<T>>`:
//! - `None` = the key was never set (omitted on encode)
//! - `Some(None)` = the key was set to `null` (encoded as `null`)
//! - `Some(Some(value))` = the key holds a value

mod reader;
mod writer;

use std::fmt;

use serde_json::{Map, Value};

use crate::error::{RecordError, RecordResult};

pub use reader::ObjectReader;
pub use writer::ObjectWriter;

// ============================================================================
// Wire kinds
// ============================================================================

/// JSON value kinds as seen by the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireKind {
    /// `null`
    Null,
    /// `true` / `false`
    Boolean,
    /// Number without a fractional part
    Integer,
    /// Any JSON number
    Number,
    /// JSON string
    String,
    /// JSON array
    Array,
    /// JSON object
    Object,
    /// String restricted to a closed set, named by the enum type
    Enum(&'static str),
}

impl WireKind {
    /// Classify a JSON value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(n) if n.is_u64() || n.is_i64() => Self::Integer,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }
}

impl fmt::Display for WireKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Boolean => f.write_str("boolean"),
            Self::Integer => f.write_str("integer"),
            Self::Number => f.write_str("number"),
            Self::String => f.write_str("string"),
            Self::Array => f.write_str("array"),
            Self::Object => f.write_str("object"),
            Self::Enum(name) => write!(f, "enum {name}"),
        }
    }
}

// ============================================================================
// Alias table
// ============================================================================

/// How a field's presence is treated on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Must be present and non-null.
    Required,
    /// May be absent; `null` reads as absent and is never emitted.
    Optional,
    /// May be absent or `null`, and the two are kept apart.
    Nullable,
    /// Always emitted; an absent key reads as `null`.
    AlwaysNullable,
}

/// One row of a record's alias table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Internal (Rust) field name
    pub name: &'static str,
    /// Name used on the wire
    pub alias: &'static str,
    /// Expected value kind
    pub kind: WireKind,
    /// Presence rule
    pub requirement: Requirement,
}

impl FieldSpec {
    /// A required, non-nullable field.
    pub const fn required(name: &'static str, alias: &'static str, kind: WireKind) -> Self {
        Self {
            name,
            alias,
            kind,
            requirement: Requirement::Required,
        }
    }

    /// An optional field that is never emitted as `null`.
    pub const fn optional(name: &'static str, alias: &'static str, kind: WireKind) -> Self {
        Self {
            name,
            alias,
            kind,
            requirement: Requirement::Optional,
        }
    }

    /// An optional field whose explicit `null` is preserved.
    pub const fn nullable(name: &'static str, alias: &'static str, kind: WireKind) -> Self {
        Self {
            name,
            alias,
            kind,
            requirement: Requirement::Nullable,
        }
    }

    /// A field that is always emitted, possibly as `null`.
    pub const fn always_nullable(name: &'static str, alias: &'static str, kind: WireKind) -> Self {
        Self {
            name,
            alias,
            kind,
            requirement: Requirement::AlwaysNullable,
        }
    }

    /// Whether `null` is a legal value for this field.
    pub const fn is_nullable(&self) -> bool {
        matches!(
            self.requirement,
            Requirement::Nullable | Requirement::AlwaysNullable
        )
    }
}

/// Whether `key` is one of the aliases in `fields`.
///
/// Matching is exact: `"ID"` is not the alias `"id"`.
pub fn is_known(fields: &[FieldSpec], key: &str) -> bool {
    fields.iter().any(|spec| spec.alias == key)
}

// ============================================================================
// Enums
// ============================================================================

/// A closed set of string values.
pub trait WireEnum: Sized + Copy {
    /// Type name used in error messages.
    const NAME: &'static str;

    /// Parse a wire string; `None` if it is outside the set.
    fn from_wire(value: &str) -> Option<Self>;

    /// The wire string for this variant.
    fn as_wire(self) -> &'static str;
}

// ============================================================================
// Record trait
// ============================================================================

/// A typed resource record exchanged as a JSON object.
pub trait WireRecord: Sized {
    /// Record type name used in error messages.
    const NAME: &'static str;

    /// The alias table, in wire order.
    const FIELDS: &'static [FieldSpec];

    /// Decode from a JSON object.
    fn decode_object(object: &Map<String, Value>) -> RecordResult<Self>;

    /// Encode into a JSON object keyed by wire aliases.
    fn encode_object(&self) -> Map<String, Value>;

    /// Fields carried through without being part of the schema.
    fn extension_fields(&self) -> &Map<String, Value>;

    /// Decode from any JSON value, rejecting non-objects.
    fn decode(payload: &Value) -> RecordResult<Self> {
        let object = payload
            .as_object()
            .ok_or_else(|| RecordError::MalformedPayload {
                record: Self::NAME,
                found: WireKind::of(payload),
            })?;
        Self::decode_object(object)
    }

    /// Encode into a JSON value.
    fn encode(&self) -> Value {
        Value::Object(self.encode_object())
    }

    /// Decode from JSON text.
    fn from_json(text: &str) -> RecordResult<Self> {
        let payload: Value = serde_json::from_str(text)?;
        Self::decode(&payload)
    }

    /// Encode as compact JSON text: known fields in alias-table order, then
    /// extension fields in the order they were decoded or inserted.
    fn to_json(&self) -> String {
        self.encode().to_string()
    }

    /// Deterministic single-line rendering with sorted keys.
    fn to_canonical_string(&self) -> String {
        sort_keys(self.encode()).to_string()
    }

    /// Deterministic indented rendering with sorted keys, for diagnostics.
    fn to_debug_string(&self) -> String {
        format!("{:#}", sort_keys(self.encode()))
    }

    /// Wire alias for an internal field name.
    fn alias_of(name: &str) -> Option<&'static str> {
        Self::FIELDS
            .iter()
            .find(|spec| spec.name == name)
            .map(|spec| spec.alias)
    }

    /// Whether `key` is part of this record's schema.
    fn is_known_alias(key: &str) -> bool {
        is_known(Self::FIELDS, key)
    }
}

/// Recursively rebuild objects with lexicographically ordered keys.
pub(crate) fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, sort_keys(value)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// Insert into an extension bag unless `key` belongs to the schema.
pub(crate) fn insert_extension(
    record: &'static str,
    fields: &[FieldSpec],
    bag: &mut Map<String, Value>,
    key: String,
    value: Value,
) -> RecordResult<Option<Value>> {
    if is_known(fields, &key) {
        return Err(RecordError::ExtensionShadowsField { record, alias: key });
    }
    Ok(bag.insert(key, value))
}

/// Implement `Serialize` / `Deserialize` for a record through its wire contract.
macro_rules! impl_wire_serde {
    ($ty:ty) => {
        impl ::serde::Serialize for $ty {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                ::serde::Serialize::serialize(
                    &$crate::record::WireRecord::encode_object(self),
                    serializer,
                )
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $ty {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let payload = <::serde_json::Value as ::serde::Deserialize>::deserialize(deserializer)?;
                <$ty as $crate::record::WireRecord>::decode(&payload)
                    .map_err(<D::Error as ::serde::de::Error>::custom)
            }
        }
    };
}

pub(crate) use impl_wire_serde;
