//! Scrape service: fetch a wiki page, extract its entries, download the card
//! images, and persist the mapping CSV.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use reqwest::blocking::Client;
use scraper::Html;
use url::Url;

use crate::config::{IMAGES_DIR, MAPPINGS_FILE};
use crate::error::{Result, ScrapeError};
use crate::http::{create_client, download_bytes, fetch_page};
use crate::mappings::{write_mappings, MappingRow};
use crate::page::{find_headings, parse_entries, PageEntry};

/// Where a page comes from: a live wiki URL or a saved HTML file.
///
/// The original pages are sometimes only reachable from a logged-in browser,
/// so "save the page, then scrape the file" is a supported workflow.
#[derive(Debug, Clone)]
pub enum PageSource {
    Url(Url),
    File(PathBuf),
}

impl PageSource {
    /// Interpret a CLI argument: an existing local path wins over a URL.
    pub fn from_arg(arg: &str) -> Result<Self> {
        let path = Path::new(arg);
        if path.exists() {
            return Ok(Self::File(path.to_path_buf()));
        }
        match Url::parse(arg) {
            Ok(url) => Ok(Self::Url(url)),
            Err(_) => Err(ScrapeError::InvalidSource(arg.to_string())),
        }
    }

    /// Base URL for resolving relative image references. Saved files have
    /// none; their image references must already be absolute.
    #[must_use]
    pub fn base_url(&self) -> Option<&Url> {
        match self {
            Self::Url(url) => Some(url),
            Self::File(_) => None,
        }
    }
}

impl fmt::Display for PageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{url}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Outcome of a scrape run.
#[derive(Debug)]
pub struct ScrapeReport {
    /// Rows written to the mapping CSV, one per saved image.
    pub rows: Vec<MappingRow>,
    /// Non-fatal problems: entries skipped, downloads failed.
    pub warnings: Vec<String>,
    /// Path of the written CSV.
    pub csv_path: PathBuf,
}

/// Scrape one page into a card set directory.
///
/// Creates `<output>/images/` and `<output>/mappings.csv`. A row is written
/// only for entries whose image actually downloaded; everything else becomes
/// a warning in the report.
///
/// # Errors
/// Fails on unreadable sources, on documents without any heading, and when
/// not a single entry survives extraction and download.
pub fn run_scrape(source: &PageSource, output_dir: &Path) -> Result<ScrapeReport> {
    let client = create_client()?;

    let html = match source {
        PageSource::Url(url) => fetch_page(&client, url.as_str())?,
        PageSource::File(path) => fs::read_to_string(path)?,
    };

    let document = Html::parse_document(&html);
    if find_headings(&document).is_empty() {
        return Err(ScrapeError::NoHeadings);
    }

    let (entries, mut warnings) = parse_entries(&document, source.base_url());
    tracing::debug!(entries = entries.len(), "page parsed");

    let images_dir = output_dir.join(IMAGES_DIR);
    fs::create_dir_all(&images_dir)?;

    let mut rows = Vec::new();
    for entry in &entries {
        let filename = entry.image_filename();
        match download_image(&client, entry) {
            Ok(bytes) => {
                fs::write(images_dir.join(&filename), bytes)?;
                rows.push(MappingRow {
                    path: format!("{IMAGES_DIR}/{filename}"),
                    reading: entry.reading.clone(),
                    additional_info: entry.additional_info.clone(),
                });
            }
            Err(e) => {
                tracing::warn!(entry = entry.index, error = %e, "image download failed");
                warnings.push(format!(
                    "entry {} ({}): image download failed, skipped",
                    entry.index, entry.reading
                ));
            }
        }
    }

    if rows.is_empty() {
        return Err(ScrapeError::NoEntries);
    }

    let csv_path = output_dir.join(MAPPINGS_FILE);
    write_mappings(&csv_path, &rows)?;

    Ok(ScrapeReport {
        rows,
        warnings,
        csv_path,
    })
}

fn download_image(client: &Client, entry: &PageEntry) -> Result<Vec<u8>> {
    download_bytes(client, entry.image_url.as_str()).map_err(|e| {
        if let ScrapeError::Http(source) = e {
            ScrapeError::ImageDownload {
                url: entry.image_url.to_string(),
                source,
            }
        } else {
            e
        }
    })
}
