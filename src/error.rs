//! Error types for the scraper.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the scraper library.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Source argument is neither an existing file nor a URL.
    #[error("Source is neither an existing file nor a valid URL: '{0}'")]
    InvalidSource(String),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to fetch the wiki page.
    #[error("Failed to fetch page {url}: {source}")]
    PageFetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Failed to download a card image.
    #[error("Failed to download image {url}: {source}")]
    ImageDownload {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Document contains no headings at all.
    #[error("No headings found in the document")]
    NoHeadings,

    /// Nothing survived extraction and download.
    #[error("No entries with a reading and a saved image; nothing to write")]
    NoEntries,

    /// A required file (mappings CSV, input CSV) is missing.
    #[error("Required file not found: {}", .0.display())]
    MissingFile(PathBuf),

    /// A required images directory is missing.
    #[error("Images directory not found: {}", .0.display())]
    MissingImagesDir(PathBuf),

    /// Images directory exists but holds no files.
    #[error("No image files in: {}", .0.display())]
    EmptyImagesDir(PathBuf),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read or write failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias for scraper operations.
pub type Result<T> = std::result::Result<T, ScrapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_source_display() {
        let err = ScrapeError::InvalidSource("not a url".to_string());
        assert!(err.to_string().contains("not a url"));
    }

    #[test]
    fn test_missing_file_display() {
        let err = ScrapeError::MissingFile(PathBuf::from("public/kanji/level-7/mappings.csv"));
        assert!(err.to_string().contains("mappings.csv"));
    }

    #[test]
    fn test_no_entries_display() {
        let err = ScrapeError::NoEntries;
        assert!(err.to_string().contains("nothing to write"));
    }
}
