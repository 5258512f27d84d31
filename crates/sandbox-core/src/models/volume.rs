//! Volume records.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RecordResult;
use crate::record::{
    FieldSpec, ObjectReader, ObjectWriter, WireEnum, WireKind, WireRecord, impl_wire_serde,
    insert_extension,
};

// ============================================================================
// Volume State
// ============================================================================

/// Lifecycle state of a volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeState {
    /// Being provisioned
    Creating,
    /// Available for use
    Ready,
    /// Queued for creation
    PendingCreate,
    /// Queued for deletion
    PendingDelete,
    /// Being removed
    Deleting,
    /// Removed
    Deleted,
    /// Failed; see `errorReason`
    Error,
}

impl VolumeState {
    /// Every state, in wire order.
    pub const ALL: [Self; 7] = [
        Self::Creating,
        Self::Ready,
        Self::PendingCreate,
        Self::PendingDelete,
        Self::Deleting,
        Self::Deleted,
        Self::Error,
    ];
}

impl WireEnum for VolumeState {
    const NAME: &'static str = "VolumeState";

    fn from_wire(value: &str) -> Option<Self> {
        match value {
            "creating" => Some(Self::Creating),
            "ready" => Some(Self::Ready),
            "pending_create" => Some(Self::PendingCreate),
            "pending_delete" => Some(Self::PendingDelete),
            "deleting" => Some(Self::Deleting),
            "deleted" => Some(Self::Deleted),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    fn as_wire(self) -> &'static str {
        match self {
            Self::Creating => "creating",
            Self::Ready => "ready",
            Self::PendingCreate => "pending_create",
            Self::PendingDelete => "pending_delete",
            Self::Deleting => "deleting",
            Self::Deleted => "deleted",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for VolumeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

// ============================================================================
// Alias table
// ============================================================================

const ID: FieldSpec = FieldSpec::required("id", "id", WireKind::String);
const NAME: FieldSpec = FieldSpec::required("name", "name", WireKind::String);
const ORGANIZATION_ID: FieldSpec =
    FieldSpec::required("organization_id", "organizationId", WireKind::String);
const STATE: FieldSpec =
    FieldSpec::required("state", "state", WireKind::Enum(VolumeState::NAME));
const CREATED_AT: FieldSpec = FieldSpec::required("created_at", "createdAt", WireKind::String);
const UPDATED_AT: FieldSpec = FieldSpec::required("updated_at", "updatedAt", WireKind::String);
const LAST_USED_AT: FieldSpec =
    FieldSpec::nullable("last_used_at", "lastUsedAt", WireKind::String);
const ERROR_REASON: FieldSpec =
    FieldSpec::always_nullable("error_reason", "errorReason", WireKind::String);

// ============================================================================
// Volume
// ============================================================================

/// Snapshot of a volume as returned by the platform API.
///
/// Timestamps are kept exactly as sent; use the `*_time` helpers to parse
/// them. `last_used_at` remembers whether the key was absent or `null`, and
/// `error_reason` is always emitted. Keys outside the schema are preserved in
/// `extension_fields`.
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeDto {
    /// Volume ID
    pub id: String,
    /// Volume name
    pub name: String,
    /// Owning organization ID
    pub organization_id: String,
    /// Lifecycle state
    pub state: VolumeState,
    /// Creation timestamp (ISO-8601)
    pub created_at: String,
    /// Last update timestamp (ISO-8601)
    pub updated_at: String,
    /// Last used timestamp: `None` = absent, `Some(None)` = `null`
    pub last_used_at: Option<Option<String>>,
    /// Why the volume entered the error state, if it did
    pub error_reason: Option<String>,
    /// Keys the schema does not know about
    pub extension_fields: Map<String, Value>,
}

impl VolumeDto {
    /// Build a volume from its required fields.
    ///
    /// `last_used_at` starts absent and `error_reason` starts `null`.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        organization_id: impl Into<String>,
        state: VolumeState,
        created_at: impl Into<String>,
        updated_at: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            organization_id: organization_id.into(),
            state,
            created_at: created_at.into(),
            updated_at: updated_at.into(),
            last_used_at: None,
            error_reason: None,
            extension_fields: Map::new(),
        }
    }

    /// Set the last-used timestamp.
    #[must_use]
    pub fn with_last_used_at(mut self, timestamp: impl Into<String>) -> Self {
        self.last_used_at = Some(Some(timestamp.into()));
        self
    }

    /// Mark the last-used timestamp as explicitly `null`.
    #[must_use]
    pub fn with_null_last_used_at(mut self) -> Self {
        self.last_used_at = Some(None);
        self
    }

    /// Set the error reason.
    #[must_use]
    pub fn with_error_reason(mut self, reason: impl Into<String>) -> Self {
        self.error_reason = Some(reason.into());
        self
    }

    /// Assign the last-used timestamp; `None` records an explicit `null`.
    pub fn set_last_used_at(&mut self, timestamp: Option<String>) {
        self.last_used_at = Some(timestamp);
    }

    /// Forget the last-used timestamp entirely, so it is omitted on encode.
    pub fn clear_last_used_at(&mut self) {
        self.last_used_at = None;
    }

    /// The last-used timestamp, if it holds a value.
    pub fn last_used_at(&self) -> Option<&str> {
        self.last_used_at.as_ref().and_then(Option::as_deref)
    }

    /// Whether the last-used key was set at all (possibly to `null`).
    pub const fn has_last_used_at(&self) -> bool {
        self.last_used_at.is_some()
    }

    /// Whether the volume is in the error state.
    pub fn is_error(&self) -> bool {
        self.state == VolumeState::Error
    }

    /// Parsed creation timestamp, if it is valid RFC 3339.
    pub fn created_at_time(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.created_at).ok()
    }

    /// Parsed update timestamp, if it is valid RFC 3339.
    pub fn updated_at_time(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.updated_at).ok()
    }

    /// Parsed last-used timestamp, if set and valid RFC 3339.
    pub fn last_used_at_time(&self) -> Option<DateTime<FixedOffset>> {
        self.last_used_at()
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
    }

    /// Look up an extension field.
    pub fn extension(&self, key: &str) -> Option<&Value> {
        self.extension_fields.get(key)
    }

    /// Store an extension field, returning any previous value.
    ///
    /// Fails if `key` is one of this record's wire aliases.
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

impl WireRecord for VolumeDto {
    const NAME: &'static str = "VolumeDto";

    const FIELDS: &'static [FieldSpec] = &[
        ID,
        NAME,
        ORGANIZATION_ID,
        STATE,
        CREATED_AT,
        UPDATED_AT,
        LAST_USED_AT,
        ERROR_REASON,
    ];

    fn decode_object(object: &Map<String, Value>) -> RecordResult<Self> {
        let reader = ObjectReader::new(Self::NAME, object);

        Ok(Self {
            id: reader.required_string(&ID)?,
            name: reader.required_string(&NAME)?,
            organization_id: reader.required_string(&ORGANIZATION_ID)?,
            state: reader.required_enum(&STATE)?,
            created_at: reader.required_string(&CREATED_AT)?,
            updated_at: reader.required_string(&UPDATED_AT)?,
            last_used_at: reader.nullable_string(&LAST_USED_AT)?,
            error_reason: reader.optional_string(&ERROR_REASON)?,
            extension_fields: reader.extensions(Self::FIELDS),
        })
    }

    fn encode_object(&self) -> Map<String, Value> {
        ObjectWriter::new()
            .put(&ID, self.id.as_str())
            .put(&NAME, self.name.as_str())
            .put(&ORGANIZATION_ID, self.organization_id.as_str())
            .put(&STATE, self.state.as_wire())
            .put(&CREATED_AT, self.created_at.as_str())
            .put(&UPDATED_AT, self.updated_at.as_str())
            .put_nullable(&LAST_USED_AT, self.last_used_at.as_ref().map(Option::as_deref))
            .put_always(&ERROR_REASON, self.error_reason.as_deref())
            .merge_extensions(Self::FIELDS, &self.extension_fields)
            .finish()
    }

    fn extension_fields(&self) -> &Map<String, Value> {
        &self.extension_fields
    }
}

impl fmt::Display for VolumeDto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical_string())
    }
}

impl_wire_serde!(VolumeDto);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Found, RecordError};
    use serde_json::json;

    fn sample_payload() -> Value {
        json!({
            "id": "vol-1",
            "name": "workspace",
            "organizationId": "org-1",
            "state": "ready",
            "createdAt": "2024-05-01T10:00:00Z",
            "updatedAt": "2024-05-02T11:30:00Z",
            "errorReason": null
        })
    }

    #[test]
    fn test_alias_table_covers_every_field() {
        let expected = [
            ("id", "id"),
            ("name", "name"),
            ("organization_id", "organizationId"),
            ("state", "state"),
            ("created_at", "createdAt"),
            ("updated_at", "updatedAt"),
            ("last_used_at", "lastUsedAt"),
            ("error_reason", "errorReason"),
        ];
        assert_eq!(VolumeDto::FIELDS.len(), expected.len());
        for (name, alias) in expected {
            assert_eq!(VolumeDto::alias_of(name), Some(alias), "alias for {name}");
            assert!(VolumeDto::is_known_alias(alias));
        }
        assert!(VolumeDto::alias_of("extension_fields").is_none());
    }

    #[test]
    fn test_nullable_fields() {
        let nullable: Vec<&str> = VolumeDto::FIELDS
            .iter()
            .filter(|spec| spec.is_nullable())
            .map(|spec| spec.alias)
            .collect();
        assert_eq!(nullable, ["lastUsedAt", "errorReason"]);
    }

    #[test]
    fn test_state_wire_strings_round_trip() {
        for state in VolumeState::ALL {
            assert_eq!(VolumeState::from_wire(state.as_wire()), Some(state));
            let via_serde = serde_json::to_value(state).unwrap();
            assert_eq!(via_serde, json!(state.as_wire()));
        }
        assert!(VolumeState::from_wire("READY").is_none());
    }

    #[test]
    fn test_decode_sample() {
        let volume = VolumeDto::decode(&sample_payload()).unwrap();
        assert_eq!(volume.id, "vol-1");
        assert_eq!(volume.organization_id, "org-1");
        assert_eq!(volume.state, VolumeState::Ready);
        assert!(!volume.has_last_used_at());
        assert!(volume.error_reason.is_none());
        assert!(volume.extension_fields.is_empty());
    }

    #[test]
    fn test_unknown_state_is_violation() {
        let mut payload = sample_payload();
        payload["state"] = json!("melting");

        match VolumeDto::decode(&payload).unwrap_err() {
            RecordError::SchemaViolation {
                field,
                expected,
                found,
                ..
            } => {
                assert_eq!(field, "state");
                assert_eq!(expected, WireKind::Enum("VolumeState"));
                assert_eq!(found, Found::UnknownVariant("melting".to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_error_reason_absent_reads_as_null_and_is_emitted() {
        let mut payload = sample_payload();
        payload.as_object_mut().unwrap().remove("errorReason");

        let volume = VolumeDto::decode(&payload).unwrap();
        assert!(volume.error_reason.is_none());
        assert_eq!(volume.encode()["errorReason"], Value::Null);
    }

    #[test]
    fn test_error_reason_wrong_kind() {
        let mut payload = sample_payload();
        payload["errorReason"] = json!(42);
        let err = VolumeDto::decode(&payload).unwrap_err();
        assert_eq!(err.field(), Some("errorReason"));
    }

    #[test]
    fn test_programmatic_build_encodes_aliases() {
        let volume = VolumeDto::new(
            "vol-9",
            "data",
            "org-1",
            VolumeState::Creating,
            "2024-01-01T00:00:00Z",
            "2024-01-01T00:00:00Z",
        );
        let encoded = volume.encode_object();

        assert_eq!(encoded.get("organizationId"), Some(&json!("org-1")));
        assert!(!encoded.contains_key("organization_id"));
        assert!(!encoded.contains_key("lastUsedAt"));
        assert_eq!(encoded.get("errorReason"), Some(&Value::Null));
        assert!(!encoded.contains_key("extension_fields"));
        assert!(!encoded.contains_key("extensionFields"));
    }

    #[test]
    fn test_set_and_clear_last_used_at() {
        let mut volume = VolumeDto::decode(&sample_payload()).unwrap();

        volume.set_last_used_at(None);
        assert!(volume.has_last_used_at());
        assert_eq!(volume.encode()["lastUsedAt"], Value::Null);

        volume.set_last_used_at(Some("2024-06-01T00:00:00Z".to_string()));
        assert_eq!(volume.last_used_at(), Some("2024-06-01T00:00:00Z"));

        volume.clear_last_used_at();
        assert!(!volume.encode_object().contains_key("lastUsedAt"));
    }

    #[test]
    fn test_builders() {
        let volume = VolumeDto::new("v", "n", "o", VolumeState::Error, "c", "u")
            .with_null_last_used_at()
            .with_error_reason("quota exceeded");

        assert!(volume.is_error());
        assert_eq!(volume.last_used_at, Some(None));
        assert_eq!(volume.error_reason.as_deref(), Some("quota exceeded"));

        let volume = volume.with_last_used_at("2024-01-01T00:00:00Z");
        assert_eq!(volume.last_used_at(), Some("2024-01-01T00:00:00Z"));
    }

    #[test]
    fn test_insert_extension_guards_known_aliases() {
        let mut volume = VolumeDto::decode(&sample_payload()).unwrap();

        assert!(volume.insert_extension("state", "deleted").is_err());
        assert_eq!(volume.state, VolumeState::Ready);

        assert!(volume.insert_extension("region", "eu-west").unwrap().is_none());
        assert_eq!(volume.extension("region"), Some(&json!("eu-west")));
        assert_eq!(volume.encode()["region"], json!("eu-west"));
    }

    #[test]
    fn test_timestamp_helpers() {
        let volume = VolumeDto::decode(&sample_payload()).unwrap();
        let created = volume.created_at_time().unwrap();
        assert_eq!(created.to_rfc3339(), "2024-05-01T10:00:00+00:00");
        assert!(volume.updated_at_time().is_some());
        assert!(volume.last_used_at_time().is_none());

        let odd = VolumeDto::new("v", "n", "o", VolumeState::Ready, "yesterday", "u");
        assert!(odd.created_at_time().is_none());
        assert_eq!(odd.created_at, "yesterday");
    }

    #[test]
    fn test_canonical_and_debug_strings_use_aliases() {
        let volume = VolumeDto::decode(&sample_payload()).unwrap();
        let canonical = volume.to_canonical_string();

        assert!(canonical.starts_with(r#"{"createdAt":"2024-05-01T10:00:00Z","errorReason":null"#));
        assert!(canonical.contains(r#""organizationId":"org-1""#));
        assert!(!canonical.contains("organization_id"));
        assert_eq!(volume.to_string(), canonical);

        let debug = volume.to_debug_string();
        assert!(debug.contains('\n'));
        assert!(debug.contains(r#""organizationId": "org-1""#));
        assert_eq!(debug, volume.to_debug_string());
    }

    #[test]
    fn test_serde_goes_through_wire_contract() {
        let volume: VolumeDto = serde_json::from_value(sample_payload()).unwrap();
        let back = serde_json::to_value(&volume).unwrap();
        assert_eq!(back, sample_payload());

        let bad: Result<VolumeDto, _> = serde_json::from_value(json!({"name": "x"}));
        let msg = bad.unwrap_err().to_string();
        assert!(msg.contains("VolumeDto"));
    }
}
