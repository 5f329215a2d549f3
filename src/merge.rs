//! Merge a freshly scraped set into an existing card set.
//!
//! Incoming images are copied under fresh sequential numbers continuing the
//! target's numbering, so nothing in the target is ever overwritten, and the
//! combined rows are written back to the target's mapping CSV.

use std::fs;
use std::path::Path;

use crate::config::{sanitize_reading, IMAGES_DIR, MAPPINGS_FILE};
use crate::error::{Result, ScrapeError};
use crate::mappings::{read_mappings, write_mappings, MappingRow};

/// Outcome of a merge.
#[derive(Debug)]
pub struct MergeReport {
    /// Rows (and images) added to the target set.
    pub merged: usize,
    /// Rows skipped because their image could not be copied.
    pub warnings: Vec<String>,
}

/// Highest leading index among `images/{N}_…` paths of the given rows.
fn max_image_index(rows: &[MappingRow]) -> usize {
    rows.iter()
        .filter_map(|row| {
            let name = Path::new(&row.path).file_name()?.to_str()?;
            name.split('_').next()?.parse::<usize>().ok()
        })
        .max()
        .unwrap_or(0)
}

/// Merge `source_dir` (a scraped set) into `target_dir` (an existing set).
///
/// # Errors
/// Fails when either mapping CSV or the source images directory is missing.
/// Per-image copy failures are warnings, not errors.
pub fn merge_sets(source_dir: &Path, target_dir: &Path) -> Result<MergeReport> {
    let source_csv = source_dir.join(MAPPINGS_FILE);
    let source_images = source_dir.join(IMAGES_DIR);
    let target_csv = target_dir.join(MAPPINGS_FILE);
    let target_images = target_dir.join(IMAGES_DIR);

    if !source_csv.is_file() {
        return Err(ScrapeError::MissingFile(source_csv));
    }
    if !source_images.is_dir() {
        return Err(ScrapeError::MissingImagesDir(source_images));
    }
    if !target_csv.is_file() {
        return Err(ScrapeError::MissingFile(target_csv));
    }
    fs::create_dir_all(&target_images)?;

    let mut rows = read_mappings(&target_csv)?;
    let incoming = read_mappings(&source_csv)?;

    let mut warnings = Vec::new();
    let mut next_index = max_image_index(&rows) + 1;
    let mut merged = 0;

    for row in incoming {
        let Some(basename) = Path::new(&row.path).file_name() else {
            warnings.push(format!("row without image path skipped: '{}'", row.reading));
            continue;
        };

        let new_name = format!("{next_index}_{}.png", sanitize_reading(&row.reading));
        let src = source_images.join(basename);
        let dst = target_images.join(&new_name);

        if let Err(e) = fs::copy(&src, &dst) {
            tracing::warn!(src = %src.display(), dst = %dst.display(), error = %e, "copy failed");
            warnings.push(format!(
                "failed to copy {} -> {}: {e}",
                src.display(),
                dst.display()
            ));
            continue;
        }

        rows.push(MappingRow {
            path: format!("{IMAGES_DIR}/{new_name}"),
            reading: row.reading,
            additional_info: row.additional_info,
        });
        next_index += 1;
        merged += 1;
    }

    write_mappings(&target_csv, &rows)?;

    Ok(MergeReport { merged, warnings })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn write_set(dir: &Path, rows: &[MappingRow], images: &[&str]) {
        fs::create_dir_all(dir.join(IMAGES_DIR)).unwrap();
        write_mappings(&dir.join(MAPPINGS_FILE), rows).unwrap();
        for image in images {
            fs::write(dir.join(IMAGES_DIR).join(image), b"png").unwrap();
        }
    }

    fn row(path: &str, reading: &str) -> MappingRow {
        MappingRow {
            path: path.to_string(),
            reading: reading.to_string(),
            additional_info: String::new(),
        }
    }

    #[test]
    fn test_merge_continues_numbering() {
        let source = tempdir().unwrap();
        let target = tempdir().unwrap();

        write_set(
            source.path(),
            &[row("images/1_かい.png", "かい"), row("images/2_ぜん.png", "ぜん")],
            &["1_かい.png", "2_ぜん.png"],
        );
        write_set(
            target.path(),
            &[row("images/7_せい.png", "せい")],
            &["7_せい.png"],
        );

        let report = merge_sets(source.path(), target.path()).unwrap();
        assert_eq!(report.merged, 2);
        assert!(report.warnings.is_empty());

        let rows = read_mappings(&target.path().join(MAPPINGS_FILE)).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].path, "images/8_かい.png");
        assert_eq!(rows[2].path, "images/9_ぜん.png");
        assert!(target.path().join("images/8_かい.png").is_file());
        assert!(target.path().join("images/9_ぜん.png").is_file());
        // Source and original target files untouched.
        assert!(source.path().join("images/1_かい.png").is_file());
        assert!(target.path().join("images/7_せい.png").is_file());
    }

    #[test]
    fn test_merge_skips_missing_source_image() {
        let source = tempdir().unwrap();
        let target = tempdir().unwrap();

        write_set(
            source.path(),
            &[row("images/1_かい.png", "かい"), row("images/2_ぜん.png", "ぜん")],
            &["2_ぜん.png"], // 1_かい.png missing on disk
        );
        write_set(target.path(), &[row("images/3_せい.png", "せい")], &["3_せい.png"]);

        let report = merge_sets(source.path(), target.path()).unwrap();
        assert_eq!(report.merged, 1);
        assert_eq!(report.warnings.len(), 1);

        let rows = read_mappings(&target.path().join(MAPPINGS_FILE)).unwrap();
        assert_eq!(rows.len(), 2);
        // Numbering only advances for rows that actually merged.
        assert_eq!(rows[1].path, "images/4_ぜん.png");
    }

    #[test]
    fn test_merge_requires_target_csv() {
        let source = tempdir().unwrap();
        let target = tempdir().unwrap();
        write_set(source.path(), &[row("images/1_かい.png", "かい")], &["1_かい.png"]);

        let err = merge_sets(source.path(), target.path()).unwrap_err();
        assert!(matches!(err, ScrapeError::MissingFile(_)));
    }

    #[test]
    fn test_merge_into_legacy_target_without_info_column() {
        let source = tempdir().unwrap();
        let target = tempdir().unwrap();

        write_set(source.path(), &[row("images/1_かい.png", "かい")], &["1_かい.png"]);
        fs::create_dir_all(target.path().join(IMAGES_DIR)).unwrap();
        fs::write(
            target.path().join(MAPPINGS_FILE),
            "path,reading\nimages/2_せい.png,せい\n",
        )
        .unwrap();

        let report = merge_sets(source.path(), target.path()).unwrap();
        assert_eq!(report.merged, 1);

        let rows = read_mappings(&target.path().join(MAPPINGS_FILE)).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].additional_info, "");
        assert_eq!(rows[1].path, "images/3_かい.png");
    }
}
