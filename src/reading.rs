//! Reading extraction from kanji entry headings.
//!
//! An entry heading renders like `ID:0001　あや<span style="color:#F54738;">しい</span>`:
//! plain text carries the base reading and a color-highlighted element carries
//! the okurigana tail. The extractor walks the heading's subtree in document
//! order and re-encodes the highlight as a quoted suffix, e.g. `あや'しい'`.

use scraper::{ElementRef, Node};

use crate::config::{
    COMMENT_MARKER, ETC_MARKER, FULL_WIDTH_SPACE, HIGHLIGHT_COLOR, IDENTIFIER_PREFIX,
    OKURIGANA_DELIMITER, PLACEHOLDER_SENTINEL,
};

/// True when an element's inline style marks it as okurigana.
///
/// Any tag qualifies, not just `<span>`; the wiki markup is not consistent
/// about which element carries the color.
fn is_okurigana(element: ElementRef<'_>) -> bool {
    element
        .value()
        .attr("style")
        .is_some_and(|style| style.to_ascii_lowercase().contains(HIGHLIGHT_COLOR))
}

/// True for trimmed text fragments that never contribute to a reading:
/// empty runs, comment fragments, and the blank-slot placeholder.
fn is_noise(text: &str) -> bool {
    text.is_empty() || text.starts_with(COMMENT_MARKER) || text == PLACEHOLDER_SENTINEL
}

/// Concatenated descendant text of a highlighted element.
///
/// Identifier tokens are NOT filtered here; that skip applies only to a
/// heading's own direct children.
fn highlighted_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|fragment| !is_noise(fragment))
        .collect()
}

/// Collect the reading fragments under `element`, in document order.
///
/// Text children are trimmed and appended unless they are noise, or unless
/// `skip_identifier` is set and they start with the identifier literal.
/// Highlighted child elements contribute their inner text wrapped in the
/// okurigana delimiter; any other child element is descended into with
/// `skip_identifier` forced off, so identifier-like text nested in a styled
/// wrapper is never dropped by mistake.
///
/// Never fails: malformed markup yields at worst an empty string.
#[must_use]
pub fn extract_reading(element: ElementRef<'_>, skip_identifier: bool) -> String {
    let mut reading = String::new();

    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let text = text.trim();
                if is_noise(text) {
                    continue;
                }
                if skip_identifier && text.starts_with(IDENTIFIER_PREFIX) {
                    continue;
                }
                reading.push_str(text);
            }
            Node::Element(_) => {
                let Some(child) = ElementRef::wrap(child) else {
                    continue;
                };
                if is_okurigana(child) {
                    let inner = highlighted_text(child);
                    if !inner.is_empty() {
                        reading.push(OKURIGANA_DELIMITER);
                        reading.push_str(&inner);
                        reading.push(OKURIGANA_DELIMITER);
                    }
                } else {
                    reading.push_str(&extract_reading(child, false));
                }
            }
            _ => {}
        }
    }

    reading
}

/// Extract the reading for one kanji entry heading.
///
/// Runs [`extract_reading`] with identifier skipping on, then strips the
/// cosmetic full-width spaces and the `等` marker some headings append.
///
/// # Returns
/// `None` when the heading yields no usable reading; the caller skips the
/// entry.
#[must_use]
pub fn heading_reading(heading: ElementRef<'_>) -> Option<String> {
    let raw = extract_reading(heading, true);
    if raw.is_empty() {
        return None;
    }

    let cleaned: String = raw
        .chars()
        .filter(|c| *c != FULL_WIDTH_SPACE && *c != ETC_MARKER)
        .collect();
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}
