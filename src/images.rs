//! Image file housekeeping: sequential renaming and originals cleanup.
//!
//! Scraped image files carry readings in their names (`3_あやしい.png`).
//! Before a set ships, files are renamed to zero-padded sequential names and
//! the reading-named originals are tucked away or deleted.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{IMAGES_DIR, MAPPINGS_FILE, ORIGINALS_BACKUP_DIR};
use crate::error::{Result, ScrapeError};
use crate::mappings::{read_mappings, write_mappings};

/// Outcome of a rename pass.
#[derive(Debug)]
pub struct RenameReport {
    /// Files copied to a sequential name.
    pub renamed: usize,
    /// Files skipped (target existed or copy failed).
    pub skipped: usize,
    /// Backup of the mapping CSV taken before rewriting.
    pub backup: PathBuf,
}

/// Outcome of an originals cleanup.
#[derive(Debug)]
pub struct CleanupReport {
    /// Files moved or deleted.
    pub processed: usize,
    /// Files that could not be moved or deleted.
    pub failed: usize,
    /// Backup directory, `None` when files were deleted outright.
    pub backup_dir: Option<PathBuf>,
}

/// Width of the zero-padded sequential names, at least three digits.
fn pad_width(count: usize) -> usize {
    count.to_string().len().max(3)
}

/// Names of the plain files directly inside `dir`, sorted.
fn sorted_files(dir: &Path) -> Result<Vec<String>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    files.sort();
    Ok(files)
}

/// True for names like `001.png` produced by [`rename_images`].
fn is_sequential(name: &str) -> bool {
    let stem = Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("");
    !stem.is_empty() && stem.bytes().all(|b| b.is_ascii_digit())
}

/// Copy every image in `<set>/images/` to a zero-padded sequential name and
/// point the mapping CSV at the new names.
///
/// Originals are kept (use [`remove_originals`] afterwards) and existing
/// targets are never overwritten. The CSV is backed up to `mappings.csv.bak`
/// before being rewritten.
pub fn rename_images(set_dir: &Path) -> Result<RenameReport> {
    let images_dir = set_dir.join(IMAGES_DIR);
    let csv_path = set_dir.join(MAPPINGS_FILE);

    if !images_dir.is_dir() {
        return Err(ScrapeError::MissingImagesDir(images_dir));
    }
    if !csv_path.is_file() {
        return Err(ScrapeError::MissingFile(csv_path));
    }

    let files = sorted_files(&images_dir)?;
    if files.is_empty() {
        return Err(ScrapeError::EmptyImagesDir(images_dir));
    }

    let width = pad_width(files.len());
    let mut mapping: HashMap<String, String> = HashMap::new();
    for (i, name) in files.iter().enumerate() {
        let ext = Path::new(name)
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        mapping.insert(name.clone(), format!("{:0width$}{ext}", i + 1));
    }

    let mut renamed = 0;
    let mut skipped = 0;
    for name in &files {
        let Some(new_name) = mapping.get(name) else {
            continue;
        };
        let dst = images_dir.join(new_name);
        if dst.exists() {
            tracing::warn!(target_file = %dst.display(), "target exists, skipping copy");
            skipped += 1;
            continue;
        }
        if let Err(e) = fs::copy(images_dir.join(name), &dst) {
            tracing::warn!(file = %name, error = %e, "copy failed");
            skipped += 1;
            continue;
        }
        renamed += 1;
    }

    let backup = csv_path.with_extension("csv.bak");
    fs::copy(&csv_path, &backup)?;

    let prefix = format!("{IMAGES_DIR}/");
    let mut rows = read_mappings(&csv_path)?;
    for row in &mut rows {
        if let Some(rest) = row.path.strip_prefix(&prefix) {
            if let Some(new_name) = mapping.get(rest) {
                row.path = format!("{IMAGES_DIR}/{new_name}");
            }
        }
    }
    write_mappings(&csv_path, &rows)?;

    Ok(RenameReport {
        renamed,
        skipped,
        backup,
    })
}

/// Move every non-sequential image file to `images/originals_backup/`, or
/// delete them outright when `delete` is set.
///
/// Per-file failures are logged and counted, never fatal.
pub fn remove_originals(set_dir: &Path, delete: bool) -> Result<CleanupReport> {
    let images_dir = set_dir.join(IMAGES_DIR);
    if !images_dir.is_dir() {
        return Err(ScrapeError::MissingImagesDir(images_dir));
    }

    let files = sorted_files(&images_dir)?;
    let originals: Vec<&String> = files.iter().filter(|name| !is_sequential(name)).collect();

    let mut processed = 0;
    let mut failed = 0;

    if delete {
        for name in &originals {
            match fs::remove_file(images_dir.join(name.as_str())) {
                Ok(()) => processed += 1,
                Err(e) => {
                    tracing::warn!(file = %name, error = %e, "delete failed");
                    failed += 1;
                }
            }
        }
        return Ok(CleanupReport {
            processed,
            failed,
            backup_dir: None,
        });
    }

    let backup_dir = images_dir.join(ORIGINALS_BACKUP_DIR);
    fs::create_dir_all(&backup_dir)?;

    for name in &originals {
        match fs::rename(images_dir.join(name.as_str()), backup_dir.join(name.as_str())) {
            Ok(()) => processed += 1,
            Err(e) => {
                tracing::warn!(file = %name, error = %e, "move failed");
                failed += 1;
            }
        }
    }

    Ok(CleanupReport {
        processed,
        failed,
        backup_dir: Some(backup_dir),
    })
}
