//! Typed wire records for the sandbox platform API.
//!
//! Every model maps a JSON object to a Rust struct through a static alias
//! table, keeps `null` apart from absent for nullable fields, and carries
//! unknown keys through `extension_fields` so that decode followed by
//! encode reproduces the payload.
//!
//! ```
//! use sandbox_core::{VolumeDto, WireRecord};
//!
//! let volume = VolumeDto::from_json(
//!     r#"{"id":"vol-1","name":"data","organizationId":"org-1","state":"ready",
//!         "createdAt":"2024-01-01T00:00:00Z","updatedAt":"2024-01-01T00:00:00Z",
//!         "lastUsedAt":null,"errorReason":null,"region":"eu"}"#,
//! )?;
//! assert_eq!(volume.encode()["lastUsedAt"], serde_json::Value::Null);
//! assert_eq!(volume.encode()["region"], "eu");
//! # Ok::<(), sandbox_core::RecordError>(())
//! ```

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

mod error;
pub mod models;
pub mod record;

// ============================================================================
// Public API
// ============================================================================

pub use error::{Found, RecordError, RecordResult};
pub use models::{CompletionItem, Paginated, PaginatedVolumes, VolumeDto, VolumeState};
pub use record::{FieldSpec, Requirement, WireEnum, WireKind, WireRecord};
