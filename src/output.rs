//! Output formatting and persistence for query results.
//!
//! Supports debug dumps, JSON on stdout, and CSV append of crop summaries.

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use crate::stats::CropSummary;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Logs any result using Rust's debug pretty-print format.
pub fn print_pretty<T: std::fmt::Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Writes a value to stdout as pretty-printed JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Appends a [`CropSummary`] as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist. Individual
/// records are not written, only the aggregate.
pub fn append_record(path: &str, summary: &CropSummary) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(summary.to_row())?;
    writer.flush()?;

    Ok(())
}
