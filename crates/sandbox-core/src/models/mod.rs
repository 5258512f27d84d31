//! API models.
//!
//! Each model owns a static alias table and implements
//! [`WireRecord`](crate::record::WireRecord) on top of it.

mod completion_item;
mod paginated;
mod volume;

pub use completion_item::CompletionItem;
pub use paginated::{Paginated, PaginatedVolumes};
pub use volume::{VolumeDto, VolumeState};
