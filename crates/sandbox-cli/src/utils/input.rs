//! Payload input helpers.

use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};

/// Read a payload from `file`, or from stdin when it is `None` or `-`.
pub fn read_payload(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => read_from(io::stdin().lock()).context("Failed to read from stdin"),
    }
}

/// Read all of `reader` as UTF-8 text.
pub fn read_from(mut reader: impl Read) -> io::Result<String> {
    let mut buffer = String::new();
    reader.read_to_string(&mut buffer)?;
    Ok(buffer)
}

/// Human-readable name of the payload source.
pub fn source_name(file: Option<&Path>) -> String {
    match file {
        Some(path) if path != Path::new("-") => path.display().to_string(),
        _ => "stdin".to_string(),
    }
}
