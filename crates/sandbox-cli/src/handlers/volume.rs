//! Volume payload handlers.
//!
//! Each handler reads a payload, decodes it through the record contract and
//! prints the re-encoded record. Decode failures surface as data errors.

use std::path::Path;

use anyhow::{Context, Result};
use sandbox_core::{PaginatedVolumes, VolumeDto, WireRecord};

use crate::commands::OutputFormat;
use crate::utils::input::{read_payload, source_name};

/// Render a record in the requested format.
pub fn render<R: WireRecord>(record: &R, format: OutputFormat) -> String {
    match format {
        OutputFormat::Canonical => record.to_canonical_string(),
        OutputFormat::Pretty => record.to_debug_string(),
        OutputFormat::Json => record.to_json(),
    }
}

/// Execute `volume decode`.
pub fn decode(file: Option<&Path>, format: OutputFormat) -> Result<()> {
    let text = read_payload(file)?;
    let volume = VolumeDto::from_json(&text)
        .with_context(|| format!("Failed to decode volume from {}", source_name(file)))?;

    tracing::debug!(
        id = %volume.id,
        state = %volume.state,
        extensions = volume.extension_fields.len(),
        "Decoded volume"
    );
    println!("{}", render(&volume, format));
    Ok(())
}

/// Execute `volume check`.
pub fn check(file: Option<&Path>) -> Result<()> {
    let text = read_payload(file)?;
    let volume = VolumeDto::from_json(&text)
        .with_context(|| format!("Volume from {} is invalid", source_name(file)))?;

    println!("{}", summary(&volume));
    Ok(())
}

/// Execute `volumes decode-page`.
pub fn decode_page(file: Option<&Path>, format: OutputFormat) -> Result<()> {
    let text = read_payload(file)?;
    let page = PaginatedVolumes::from_json(&text)
        .with_context(|| format!("Failed to decode volume page from {}", source_name(file)))?;

    tracing::debug!(
        items = page.items.len(),
        page = page.page,
        total_pages = page.total_pages,
        "Decoded volume page"
    );
    println!("{}", render(&page, format));
    Ok(())
}

/// One-line result of a successful check.
pub fn summary(volume: &VolumeDto) -> String {
    let mut line = format!("ok: {} ({}) is {}", volume.name, volume.id, volume.state);
    if let Some(reason) = &volume.error_reason {
        line.push_str(&format!(": {reason}"));
    }
    if !volume.extension_fields.is_empty() {
        let keys: Vec<&str> = volume.extension_fields.keys().map(String::as_str).collect();
        line.push_str(&format!(" [extension fields: {}]", keys.join(", ")));
    }
    line
}
