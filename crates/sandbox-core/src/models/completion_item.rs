//! Completion entries returned by the toolbox language-server endpoints.

use std::fmt;

use serde_json::{Map, Number, Value};

use crate::error::RecordResult;
use crate::record::{
    FieldSpec, ObjectReader, ObjectWriter, WireKind, WireRecord, impl_wire_serde,
    insert_extension,
};

const LABEL: FieldSpec = FieldSpec::required("label", "label", WireKind::String);
const KIND: FieldSpec = FieldSpec::optional("kind", "kind", WireKind::Number);
const DETAIL: FieldSpec = FieldSpec::optional("detail", "detail", WireKind::String);
const DOCUMENTATION: FieldSpec =
    FieldSpec::optional("documentation", "documentation", WireKind::Object);
const SORT_TEXT: FieldSpec = FieldSpec::optional("sort_text", "sortText", WireKind::String);
const FILTER_TEXT: FieldSpec = FieldSpec::optional("filter_text", "filterText", WireKind::String);
const INSERT_TEXT: FieldSpec = FieldSpec::optional("insert_text", "insertText", WireKind::String);

/// A single completion suggestion.
///
/// Only `label` is required. None of the optional fields are nullable: a
/// `null` on the wire reads as "not set" and is never written back.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionItem {
    /// Text shown in the completion list
    pub label: String,
    /// LSP completion kind, kept in its original numeric form
    pub kind: Option<Number>,
    /// Extra detail (usually a signature)
    pub detail: Option<String>,
    /// Documentation payload, passed through as-is
    pub documentation: Option<Map<String, Value>>,
    /// Sort key
    pub sort_text: Option<String>,
    /// Filter key
    pub filter_text: Option<String>,
    /// Text inserted on accept, when it differs from `label`
    pub insert_text: Option<String>,
    /// Keys the schema does not know about
    pub extension_fields: Map<String, Value>,
}

impl CompletionItem {
    /// Create an item with only a label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: None,
            detail: None,
            documentation: None,
            sort_text: None,
            filter_text: None,
            insert_text: None,
            extension_fields: Map::new(),
        }
    }

    /// Set the completion kind.
    #[must_use]
    pub fn with_kind(mut self, kind: u32) -> Self {
        self.kind = Some(Number::from(kind));
        self
    }

    /// Set the detail text.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Set the insert text.
    #[must_use]
    pub fn with_insert_text(mut self, text: impl Into<String>) -> Self {
        self.insert_text = Some(text.into());
        self
    }

    /// Completion kind as a float, if set.
    pub fn kind_f64(&self) -> Option<f64> {
        self.kind.as_ref().and_then(Number::as_f64)
    }

    /// Text to insert when the item is accepted.
    pub fn effective_insert_text(&self) -> &str {
        self.insert_text.as_deref().unwrap_or(&self.label)
    }

    /// Store an extension field, returning any previous value.
    pub fn insert_extension(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> RecordResult<Option<Value>> {
        insert_extension(
            Self::NAME,
            Self::FIELDS,
            &mut self.extension_fields,
            key.into(),
            value.into(),
        )
    }
}

impl WireRecord for CompletionItem {
    const NAME: &'static str = "CompletionItem";

    const FIELDS: &'static [FieldSpec] = &[
        LABEL,
        KIND,
        DETAIL,
        DOCUMENTATION,
        SORT_TEXT,
        FILTER_TEXT,
        INSERT_TEXT,
    ];

    fn decode_object(object: &Map<String, Value>) -> RecordResult<Self> {
        let reader = ObjectReader::new(Self::NAME, object);

        Ok(Self {
            label: reader.required_string(&LABEL)?,
            kind: reader.optional_number(&KIND)?,
            detail: reader.optional_string(&DETAIL)?,
            documentation: reader.optional_object(&DOCUMENTATION)?,
            sort_text: reader.optional_string(&SORT_TEXT)?,
            filter_text: reader.optional_string(&FILTER_TEXT)?,
            insert_text: reader.optional_string(&INSERT_TEXT)?,
            extension_fields: reader.extensions(Self::FIELDS),
        })
    }

    fn encode_object(&self) -> Map<String, Value> {
        ObjectWriter::new()
            .put(&LABEL, self.label.as_str())
            .put_optional(&KIND, self.kind.clone())
            .put_optional(&DETAIL, self.detail.as_deref())
            .put_optional(&DOCUMENTATION, self.documentation.clone())
            .put_optional(&SORT_TEXT, self.sort_text.as_deref())
            .put_optional(&FILTER_TEXT, self.filter_text.as_deref())
            .put_optional(&INSERT_TEXT, self.insert_text.as_deref())
            .merge_extensions(Self::FIELDS, &self.extension_fields)
            .finish()
    }

    fn extension_fields(&self) -> &Map<String, Value> {
        &self.extension_fields
    }
}

impl fmt::Display for CompletionItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical_string())
    }
}

impl_wire_serde!(CompletionItem);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_label_only() {
        let item = CompletionItem::from_json(r#"{"label": "println!"}"#).unwrap();
        assert_eq!(item.label, "println!");
        assert!(item.kind.is_none());
        assert_eq!(item.encode(), json!({"label": "println!"}));
    }

    #[test]
    fn test_missing_label_is_violation() {
        let err = CompletionItem::decode(&json!({"detail": "fn()"})).unwrap_err();
        assert!(err.is_schema_violation());
        assert_eq!(err.field(), Some("label"));
    }

    #[test]
    fn test_null_optional_reads_as_absent() {
        let item = CompletionItem::decode(&json!({"label": "x", "detail": null, "kind": null}))
            .unwrap();
        assert!(item.detail.is_none());
        assert!(item.kind.is_none());
        assert_eq!(item.encode(), json!({"label": "x"}));
    }

    #[test]
    fn test_kind_keeps_numeric_form() {
        let integer = CompletionItem::decode(&json!({"label": "x", "kind": 3})).unwrap();
        assert_eq!(integer.encode()["kind"], json!(3));
        assert_eq!(integer.kind_f64(), Some(3.0));

        let float = CompletionItem::decode(&json!({"label": "x", "kind": 2.5})).unwrap();
        assert_eq!(float.encode()["kind"], json!(2.5));
    }

    #[test]
    fn test_kind_wrong_type() {
        let err = CompletionItem::decode(&json!({"label": "x", "kind": "function"})).unwrap_err();
        assert_eq!(err.field(), Some("kind"));
    }

    #[test]
    fn test_documentation_passthrough() {
        let payload = json!({
            "label": "len",
            "documentation": {"kind": "markdown", "value": "Returns the length."},
            "insertText": "len()",
            "data": {"resolveId": 17}
        });
        let item = CompletionItem::decode(&payload).unwrap();
        assert_eq!(item.effective_insert_text(), "len()");
        assert_eq!(item.extension_fields.get("data"), Some(&json!({"resolveId": 17})));
        assert_eq!(item.encode(), payload);
    }

    #[test]
    fn test_builders_and_insert_text_fallback() {
        let item = CompletionItem::new("push")
            .with_kind(2)
            .with_detail("fn push(&mut self, value: T)");
        assert_eq!(item.effective_insert_text(), "push");
        assert_eq!(item.encode()["kind"], json!(2));

        let item = item.with_insert_text("push($0)");
        assert_eq!(item.effective_insert_text(), "push($0)");
    }

    #[test]
    fn test_insert_extension_rejects_alias() {
        let mut item = CompletionItem::new("x");
        assert!(item.insert_extension("sortText", "a").is_err());
        assert!(item.insert_extension("score", 0.9).is_ok());
    }
}
