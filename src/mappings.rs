//! Mapping rows and their CSV persistence.
//!
//! `mappings.csv` is the persisted artifact of a scrape: one row per card,
//! UTF-8, header included.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One row of `mappings.csv`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingRow {
    /// Image path relative to the set directory, e.g. `images/1_あやしい.png`.
    pub path: String,

    /// Reading string, okurigana wrapped in `'…'`.
    pub reading: String,

    /// Free-text notes scraped alongside the image, may be empty.
    #[serde(default)]
    pub additional_info: String,
}

/// Read a mappings file.
///
/// Sets written before the `additional_info` column existed load with an
/// empty value for it.
pub fn read_mappings(path: &Path) -> Result<Vec<MappingRow>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

/// Write a mappings file (header row included).
pub fn write_mappings(path: &Path, rows: &[MappingRow]) -> Result<()> {
    write_csv(path, rows)
}

/// Serialize rows to a CSV file using the atomic write pattern: write to a
/// temp file in the target directory, sync to disk, then rename. Partial
/// writes never corrupt an existing file.
pub(crate) fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "out.csv".to_string());
    let temp_path = dir.join(format!(".{file_name}.tmp"));

    let mut buffer = Vec::new();
    {
        let mut writer = csv::Writer::from_writer(&mut buffer);
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
    }

    // Write to temp file first, then sync and rename for atomicity
    {
        let mut file = File::create(&temp_path)?;
        file.write_all(&buffer)?;
        file.sync_all()?; // Ensure data is flushed to disk
    }

    // On Windows, rename fails if the destination already exists
    #[cfg(target_os = "windows")]
    if path.exists() {
        fs::remove_file(path)?;
    }

    fs::rename(&temp_path, path)?;
    Ok(())
}
