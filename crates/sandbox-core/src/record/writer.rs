//! Builds wire objects from typed field values.

use serde_json::{Map, Value};

use super::{FieldSpec, is_known};

/// Accumulates a wire object keyed by alias-table aliases.
#[derive(Debug, Default)]
pub struct ObjectWriter {
    object: Map<String, Value>,
}

impl ObjectWriter {
    /// Start an empty object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a field unconditionally.
    pub fn put(&mut self, spec: &FieldSpec, value: impl Into<Value>) -> &mut Self {
        self.object.insert(spec.alias.to_string(), value.into());
        self
    }

    /// Emit a field only if it holds a value.
    pub fn put_optional<T>(&mut self, spec: &FieldSpec, value: Option<T>) -> &mut Self
    where
        T: Into<Value>,
    {
        if let Some(value) = value {
            self.put(spec, value);
        }
        self
    }

    /// Emit a nullable field according to its presence state.
    ///
    /// Never-set fields are omitted; fields explicitly set to `null` are
    /// emitted as `null`.
    pub fn put_nullable<T>(&mut self, spec: &FieldSpec, value: Option<Option<T>>) -> &mut Self
    where
        T: Into<Value>,
    {
        match value {
            None => {}
            Some(None) => {
                self.put(spec, Value::Null);
            }
            Some(Some(value)) => {
                self.put(spec, value);
            }
        }
        self
    }

    /// Emit a field that is always present, as `null` when unset.
    pub fn put_always<T>(&mut self, spec: &FieldSpec, value: Option<T>) -> &mut Self
    where
        T: Into<Value>,
    {
        match value {
            Some(value) => self.put(spec, value),
            None => self.put(spec, Value::Null),
        }
    }

    /// Merge extension entries at the top level, after the known fields.
    ///
    /// An entry whose key is one of `fields` is skipped, so extensions
    /// never overwrite a known field.
    pub fn merge_extensions(
        &mut self,
        fields: &[FieldSpec],
        extensions: &Map<String, Value>,
    ) -> &mut Self {
        for (key, value) in extensions {
            if !is_known(fields, key) {
                self.object.insert(key.clone(), value.clone());
            }
        }
        self
    }

    /// Take the finished object.
    pub fn finish(&mut self) -> Map<String, Value> {
        std::mem::take(&mut self.object)
    }
}
