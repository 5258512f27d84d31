//! Typed reads from a wire object, driven by alias-table rows.

use serde_json::{Map, Number, Value};

use super::{FieldSpec, WireEnum, WireKind, is_known};
use crate::error::{Found, RecordError, RecordResult};

/// Reads fields out of a JSON object on behalf of one record type.
///
/// Every accessor looks the field up by its wire alias and reports
/// mismatches as [`RecordError::SchemaViolation`] naming that alias.
pub struct ObjectReader<'a> {
    record: &'static str,
    object: &'a Map<String, Value>,
}

impl<'a> ObjectReader<'a> {
    /// Create a reader for `record` over `object`.
    pub const fn new(record: &'static str, object: &'a Map<String, Value>) -> Self {
        Self { record, object }
    }

    fn violation(&self, spec: &FieldSpec, found: Found) -> RecordError {
        RecordError::SchemaViolation {
            record: self.record,
            field: spec.alias.to_string(),
            expected: spec.kind,
            found,
        }
    }

    /// Three-state lookup: absent, `null`, or a converted value.
    fn slot<T>(
        &self,
        spec: &FieldSpec,
        convert: impl FnOnce(&'a Value) -> Option<T>,
    ) -> RecordResult<Option<Option<T>>> {
        match self.object.get(spec.alias) {
            None => Ok(None),
            Some(Value::Null) => Ok(Some(None)),
            Some(value) => convert(value)
                .map(|converted| Some(Some(converted)))
                .ok_or_else(|| self.violation(spec, Found::Kind(WireKind::of(value)))),
        }
    }

    fn require<T>(&self, spec: &FieldSpec, slot: Option<Option<T>>) -> RecordResult<T> {
        match slot {
            Some(Some(value)) => Ok(value),
            Some(None) => Err(self.violation(spec, Found::Kind(WireKind::Null))),
            None => Err(self.violation(spec, Found::Missing)),
        }
    }

    /// Raw presence state of a string field.
    pub fn string(&self, spec: &FieldSpec) -> RecordResult<Option<Option<String>>> {
        self.slot(spec, |value| value.as_str().map(str::to_string))
    }

    /// A string that must be present and non-null.
    pub fn required_string(&self, spec: &FieldSpec) -> RecordResult<String> {
        let slot = self.string(spec)?;
        self.require(spec, slot)
    }

    /// A string where absent and `null` both mean "not set".
    pub fn optional_string(&self, spec: &FieldSpec) -> RecordResult<Option<String>> {
        Ok(self.string(spec)?.flatten())
    }

    /// A string whose explicit `null` must be remembered.
    pub fn nullable_string(&self, spec: &FieldSpec) -> RecordResult<Option<Option<String>>> {
        self.string(spec)
    }

    /// A closed-set string that must be present.
    pub fn required_enum<E: WireEnum>(&self, spec: &FieldSpec) -> RecordResult<E> {
        let raw = self.required_string(spec)?;
        E::from_wire(&raw).ok_or_else(|| self.violation(spec, Found::UnknownVariant(raw)))
    }

    /// A non-negative integer that must be present.
    pub fn required_u64(&self, spec: &FieldSpec) -> RecordResult<u64> {
        let slot = self.slot(spec, Value::as_u64)?;
        self.require(spec, slot)
    }

    /// Any JSON number, kept in its original representation.
    pub fn optional_number(&self, spec: &FieldSpec) -> RecordResult<Option<Number>> {
        let slot = self.slot(spec, |value| match value {
            Value::Number(n) => Some(n.clone()),
            _ => None,
        })?;
        Ok(slot.flatten())
    }

    /// A nested object where absent and `null` both mean "not set".
    pub fn optional_object(&self, spec: &FieldSpec) -> RecordResult<Option<Map<String, Value>>> {
        let slot = self.slot(spec, |value| value.as_object().cloned())?;
        Ok(slot.flatten())
    }

    /// An array that must be present.
    pub fn required_array(&self, spec: &FieldSpec) -> RecordResult<&'a [Value]> {
        let slot = self.slot(spec, |value| value.as_array().map(Vec::as_slice))?;
        self.require(spec, slot)
    }

    /// Every key outside `fields`, copied verbatim.
    pub fn extensions(&self, fields: &[FieldSpec]) -> Map<String, Value> {
        self.object
            .iter()
            .filter(|(key, _)| !is_known(fields, key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const NAME: FieldSpec = FieldSpec::required("name", "name", WireKind::String);
    const SEEN: FieldSpec = FieldSpec::nullable("last_seen", "lastSeen", WireKind::String);
    const COUNT: FieldSpec = FieldSpec::required("count", "count", WireKind::Integer);
    const TAGS: FieldSpec = FieldSpec::required("tags", "tags", WireKind::Array);

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_required_string_present() {
        let obj = object(json!({"name": "alpha"}));
        let reader = ObjectReader::new("Test", &obj);
        assert_eq!(reader.required_string(&NAME).unwrap(), "alpha");
    }

    #[test]
    fn test_required_string_missing() {
        let obj = object(json!({}));
        let reader = ObjectReader::new("Test", &obj);
        let err = reader.required_string(&NAME).unwrap_err();
        assert!(matches!(
            err,
            RecordError::SchemaViolation { found: Found::Missing, .. }
        ));
    }

    #[test]
    fn test_required_string_null_is_violation() {
        let obj = object(json!({"name": null}));
        let reader = ObjectReader::new("Test", &obj);
        let err = reader.required_string(&NAME).unwrap_err();
        assert!(matches!(
            err,
            RecordError::SchemaViolation {
                found: Found::Kind(WireKind::Null),
                ..
            }
        ));
    }

    #[test]
    fn test_required_string_wrong_kind() {
        let obj = object(json!({"name": 7}));
        let reader = ObjectReader::new("Test", &obj);
        match reader.required_string(&NAME).unwrap_err() {
            RecordError::SchemaViolation {
                field,
                expected,
                found,
                ..
            } => {
                assert_eq!(field, "name");
                assert_eq!(expected, WireKind::String);
                assert_eq!(found, Found::Kind(WireKind::Integer));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_nullable_string_three_states() {
        let absent = object(json!({}));
        let null = object(json!({"lastSeen": null}));
        let set = object(json!({"lastSeen": "2024-01-01T00:00:00Z"}));

        assert_eq!(
            ObjectReader::new("Test", &absent).nullable_string(&SEEN).unwrap(),
            None
        );
        assert_eq!(
            ObjectReader::new("Test", &null).nullable_string(&SEEN).unwrap(),
            Some(None)
        );
        assert_eq!(
            ObjectReader::new("Test", &set).nullable_string(&SEEN).unwrap(),
            Some(Some("2024-01-01T00:00:00Z".to_string()))
        );
    }

    #[test]
    fn test_required_u64_rejects_fraction() {
        let obj = object(json!({"count": 1.5}));
        let reader = ObjectReader::new("Test", &obj);
        let err = reader.required_u64(&COUNT).unwrap_err();
        assert!(matches!(
            err,
            RecordError::SchemaViolation {
                found: Found::Kind(WireKind::Number),
                ..
            }
        ));
    }

    #[test]
    fn test_required_array() {
        let obj = object(json!({"tags": ["a", "b"]}));
        let reader = ObjectReader::new("Test", &obj);
        assert_eq!(reader.required_array(&TAGS).unwrap().len(), 2);
    }

    #[test]
    fn test_extensions_skip_known_aliases() {
        let obj = object(json!({"name": "alpha", "Name": "shadow", "extra": [1, 2]}));
        let reader = ObjectReader::new("Test", &obj);
        let ext = reader.extensions(&[NAME, SEEN]);

        assert_eq!(ext.len(), 2);
        assert_eq!(ext.get("Name"), Some(&json!("shadow")));
        assert_eq!(ext.get("extra"), Some(&json!([1, 2])));
        assert!(!ext.contains_key("name"));
    }
}
