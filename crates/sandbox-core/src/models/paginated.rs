//! Paginated list envelope.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::RecordResult;
use crate::record::{FieldSpec, ObjectReader, ObjectWriter, WireKind, WireRecord};

use super::VolumeDto;

const ITEMS: FieldSpec = FieldSpec::required("items", "items", WireKind::Array);
const TOTAL: FieldSpec = FieldSpec::required("total", "total", WireKind::Integer);
const PAGE: FieldSpec = FieldSpec::required("page", "page", WireKind::Integer);
const TOTAL_PAGES: FieldSpec = FieldSpec::required("total_pages", "totalPages", WireKind::Integer);

/// One page of records from a list endpoint.
///
/// Each item is decoded with its own record contract, so item-level
/// extension fields survive alongside page-level ones.
#[derive(Debug, Clone, PartialEq)]
pub struct Paginated<T> {
    /// Records on this page
    pub items: Vec<T>,
    /// Total record count across all pages
    pub total: u64,
    /// Current page number
    pub page: u64,
    /// Number of pages available
    pub total_pages: u64,
    /// Keys the schema does not know about
    pub extension_fields: Map<String, Value>,
}

/// A page of volumes.
pub type PaginatedVolumes = Paginated<VolumeDto>;

impl<T> Paginated<T> {
    /// Create a page envelope.
    pub fn new(items: Vec<T>, total: u64, page: u64, total_pages: u64) -> Self {
        Self {
            items,
            total,
            page,
            total_pages,
            extension_fields: Map::new(),
        }
    }

    /// Whether a later page exists.
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Whether this page holds no records.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: WireRecord> WireRecord for Paginated<T> {
    const NAME: &'static str = "Paginated";

    const FIELDS: &'static [FieldSpec] = &[ITEMS, TOTAL, PAGE, TOTAL_PAGES];

    fn decode_object(object: &Map<String, Value>) -> RecordResult<Self> {
        let reader = ObjectReader::new(Self::NAME, object);

        let items = reader
            .required_array(&ITEMS)?
            .iter()
            .enumerate()
            .map(|(index, item)| {
                T::decode(item)
                    .map_err(|err| err.nested(Self::NAME, &format!("{}[{index}]", ITEMS.alias)))
            })
            .collect::<RecordResult<Vec<T>>>()?;

        Ok(Self {
            items,
            total: reader.required_u64(&TOTAL)?,
            page: reader.required_u64(&PAGE)?,
            total_pages: reader.required_u64(&TOTAL_PAGES)?,
            extension_fields: reader.extensions(Self::FIELDS),
        })
    }

    fn encode_object(&self) -> Map<String, Value> {
        let items: Vec<Value> = self.items.iter().map(T::encode).collect();

        ObjectWriter::new()
            .put(&ITEMS, items)
            .put(&TOTAL, self.total)
            .put(&PAGE, self.page)
            .put(&TOTAL_PAGES, self.total_pages)
            .merge_extensions(Self::FIELDS, &self.extension_fields)
            .finish()
    }

    fn extension_fields(&self) -> &Map<String, Value> {
        &self.extension_fields
    }
}

impl<T: WireRecord> Serialize for Paginated<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.encode_object().serialize(serializer)
    }
}

impl<'de, T: WireRecord> Deserialize<'de> for Paginated<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let payload = Value::deserialize(deserializer)?;
        Self::decode(&payload).map_err(serde::de::Error::custom)
    }
}
