//! Kanji card scraper - collect readings and card images from atwiki pages.
//!
//! The scraper walks a wiki page for `ID:NNNN` entry headings, extracts each
//! entry's reading (okurigana re-encoded as `'…'`), downloads the card image
//! that follows the heading, and writes a `mappings.csv` describing the set.
//! Companion commands merge scraped sets, renumber image files, and generate
//! game attributes for the collected kanji.
//!
//! # Example
//!
//! ```
//! use scraper::{Html, Selector};
//! use kanji_scraper::reading::heading_reading;
//!
//! let html = Html::parse_fragment(
//!     r#"<h3>ID:0001<!-- a -->　あや<span style="color:#F54738;">しい</span></h3>"#,
//! );
//! let selector = Selector::parse("h3").unwrap();
//! let heading = html.select(&selector).next().unwrap();
//! assert_eq!(heading_reading(heading).as_deref(), Some("あや'しい'"));
//! ```
//!
//! # Architecture
//!
//! The scraper is organized into several modules:
//!
//! - [`config`]: constants and heading/filename validation
//! - [`error`]: error types and Result alias
//! - [`http`]: HTTP client for pages and card images
//! - [`reading`]: reading extraction from entry headings
//! - [`page`]: page parsing (headings, card images, notes)
//! - [`scrape`]: scrape service tying page, http, and mappings together
//! - [`mappings`]: mapping rows and CSV persistence
//! - [`merge`]: merging scraped sets
//! - [`images`]: image file housekeeping
//! - [`attributes`]: game-attribute generation
//! - [`text`]: reading normalization
//! - [`cli`]: command-line interface

pub mod attributes;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod images;
pub mod mappings;
pub mod merge;
pub mod page;
pub mod reading;
pub mod scrape;
pub mod text;

// Re-export main functions
pub use scrape::run_scrape;

// Re-export commonly used items
pub use error::{Result, ScrapeError};
pub use mappings::MappingRow;
pub use reading::{extract_reading, heading_reading};
pub use scrape::PageSource;
