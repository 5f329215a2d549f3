//! Configuration constants and validation functions for the scraper.

use regex::Regex;
use std::sync::LazyLock;

/// HTTP timeout in seconds.
///
/// The wiki and its image host both answer quickly; 10 seconds is enough to
/// ride out a slow response without hanging a whole scrape run.
pub const HTTP_TIMEOUT_SECS: u64 = 10;

/// Inline-style color that marks okurigana in entry headings.
///
/// Stored lowercase; matching is case-insensitive because the wiki markup
/// mixes `#F54738` and `#f54738`.
pub const HIGHLIGHT_COLOR: &str = "#f54738";

/// Delimiter the reading string uses to re-encode okurigana, e.g. `あや'しい'`.
pub const OKURIGANA_DELIMITER: char = '\'';

/// Literal prefix of identifier tokens in entry headings (`ID:0001` etc.).
pub const IDENTIFIER_PREFIX: &str = "ID";

/// Prefix of comment fragments that leak into text nodes of wiki markup.
pub const COMMENT_MARKER: &str = "<!--";

/// Placeholder the wiki uses for an intentionally blank slot.
pub const PLACEHOLDER_SENTINEL: &str = "@@@@@";

/// Full-width space, stripped from readings and used to join notes.
pub const FULL_WIDTH_SPACE: char = '\u{3000}';

/// Separator between free-text note fragments in `additional_info`.
pub const INFO_SEPARATOR: &str = "\u{3000}";

/// "Etc." marker some headings append to the reading; stripped from output.
pub const ETC_MARKER: char = '等';

/// Name of the per-set mapping CSV.
pub const MAPPINGS_FILE: &str = "mappings.csv";

/// Name of the per-set image directory.
pub const IMAGES_DIR: &str = "images";

/// Directory (inside `images/`) that `remove-originals` moves files into.
pub const ORIGINALS_BACKUP_DIR: &str = "originals_backup";

/// Entry heading pattern: `ID:` followed by a 4-digit identifier.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static HEADING_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^ID:\d{4}").expect("valid regex"));

/// Check whether a heading's collapsed text introduces a kanji entry.
///
/// # Examples
/// ```
/// use kanji_scraper::config::is_kanji_heading;
///
/// assert!(is_kanji_heading("ID:0001あや"));
/// assert!(!is_kanji_heading("関連ページ"));
/// ```
#[must_use]
pub fn is_kanji_heading(text: &str) -> bool {
    HEADING_ID_PATTERN.is_match(text)
}

/// Make a reading safe to embed in an image file name.
///
/// The okurigana delimiter is dropped, the ideographic comma becomes a plain
/// comma, and filesystem-reserved characters are replaced with underscores.
///
/// # Examples
/// ```
/// use kanji_scraper::config::sanitize_reading;
///
/// assert_eq!(sanitize_reading("あや'しい'"), "あやしい");
/// assert_eq!(sanitize_reading("えい、ふん"), "えい,ふん");
/// ```
#[must_use]
pub fn sanitize_reading(reading: &str) -> String {
    reading
        .chars()
        .filter_map(|c| match c {
            OKURIGANA_DELIMITER => None,
            '、' => Some(','),
            '/' | '\\' | '"' | ':' | '*' | '?' | '<' | '>' | '|' => Some('_'),
            c => Some(c),
        })
        .collect()
}
