//! Wiki page parsing: locate kanji entry headings and pair each with its card
//! image and any free-text notes.
//!
//! Entries look like
//!
//! ```html
//! <h3>ID:0001<!-- anchor -->　あや<span style="color:#F54738;">しい</span></h3>
//! <div>
//!   <picture><img src="//img.atwiki.jp/yuia_sk/attach/16/55/ID081.png"></picture>
//!   部首は「りっしんべん」
//! </div>
//! ```
//!
//! with the image and notes somewhere between one heading and the next.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Node, Selector};
use url::Url;

use crate::config::{is_kanji_heading, sanitize_reading, COMMENT_MARKER, INFO_SEPARATOR};
use crate::reading::heading_reading;
use crate::text::normalize_reading;

#[allow(clippy::expect_used)] // Static selectors that are guaranteed to be valid
static HEADING_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h3").expect("valid selector"));
#[allow(clippy::expect_used)]
static PICTURE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("picture").expect("valid selector"));
#[allow(clippy::expect_used)]
static IMG_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("valid selector"));

/// One kanji entry extracted from a page, ready for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEntry {
    /// 1-based position of the entry's heading among ALL `<h3>` elements.
    /// Skipped headings consume positions, so numbering is stable across
    /// re-scrapes of the same page.
    pub index: usize,

    /// Normalized reading, okurigana wrapped in `'…'`.
    pub reading: String,

    /// Absolute URL of the card image.
    pub image_url: Url,

    /// Free-text notes found next to the image, may be empty.
    pub additional_info: String,
}

impl PageEntry {
    /// File name the card image is saved under: `{index}_{reading}{ext}`.
    ///
    /// The extension follows the source URL (`.jpg` stays `.jpg`, everything
    /// else is treated as PNG, which is what the wiki serves).
    #[must_use]
    pub fn image_filename(&self) -> String {
        format!(
            "{}_{}{}",
            self.index,
            sanitize_reading(&self.reading),
            image_extension(self.image_url.path())
        )
    }
}

fn image_extension(url_path: &str) -> &'static str {
    if url_path.to_ascii_lowercase().ends_with(".jpg") {
        ".jpg"
    } else {
        ".png"
    }
}

/// All `<h3>` elements of the document, in document order.
#[must_use]
pub fn find_headings(document: &Html) -> Vec<ElementRef<'_>> {
    document.select(&HEADING_SELECTOR).collect()
}

/// Collapsed text of an element: all descendant text, fragments trimmed and
/// concatenated. Used for entry detection on headings.
fn collapsed_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

/// Image reference found for an entry, plus the `<div>` that contained it
/// (source of the free-text notes).
struct Card<'a> {
    src: &'a str,
    info_div: Option<ElementRef<'a>>,
}

/// First usable image `src` under `element`: a `<picture>`'s inner `<img>`
/// wins over a bare `<img>`.
fn image_src<'a>(element: ElementRef<'a>) -> Option<&'a str> {
    let picture = if element.value().name() == "picture" {
        Some(element)
    } else {
        element.select(&PICTURE_SELECTOR).next()
    };
    if let Some(picture) = picture {
        if let Some(src) = picture
            .select(&IMG_SELECTOR)
            .next()
            .and_then(|img| img.value().attr("src"))
        {
            return Some(src);
        }
    }

    let img = if element.value().name() == "img" {
        Some(element)
    } else {
        element.select(&IMG_SELECTOR).next()
    };
    img.and_then(|img| img.value().attr("src"))
}

/// Scan the siblings after `heading` (up to the next `<h3>`) for the entry's
/// card image, remembering the most recent `<div>` as the notes container.
fn find_card<'a>(heading: ElementRef<'a>) -> Option<Card<'a>> {
    let mut info_div = None;

    for sibling in heading.next_siblings() {
        let Some(element) = ElementRef::wrap(sibling) else {
            continue;
        };
        let name = element.value().name();
        if name == "h3" {
            break;
        }
        if name == "div" {
            info_div = Some(element);
        }
        if let Some(src) = image_src(element) {
            return Some(Card { src, info_div });
        }
    }

    None
}

/// Join the direct text-node children of the notes container.
fn additional_info(info_div: Option<ElementRef<'_>>) -> String {
    let Some(div) = info_div else {
        return String::new();
    };

    div.children()
        .filter_map(|child| match child.value() {
            Node::Text(text) => {
                let text = text.trim();
                (!text.is_empty() && !text.starts_with(COMMENT_MARKER)).then_some(text)
            }
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(INFO_SEPARATOR)
}

/// Resolve an image `src` attribute to an absolute URL.
///
/// Protocol-relative references (common in the wiki markup) get `https:`.
/// Relative references need `base`; without one the entry cannot be
/// downloaded and is dropped by the caller.
fn resolve_image_url(src: &str, base: Option<&Url>) -> Option<Url> {
    let src = if let Some(rest) = src.strip_prefix("//") {
        format!("https://{rest}")
    } else {
        src.to_string()
    };

    match Url::parse(&src) {
        Ok(url) => Some(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => base.and_then(|b| b.join(&src).ok()),
        Err(_) => None,
    }
}

/// Extract all kanji entries from a parsed page.
///
/// Headings that are not entries are ignored; entries missing a reading or a
/// resolvable image are skipped with a warning. Warnings are non-fatal and
/// returned alongside the entries.
#[must_use]
pub fn parse_entries(document: &Html, base: Option<&Url>) -> (Vec<PageEntry>, Vec<String>) {
    let mut entries = Vec::new();
    let mut warnings = Vec::new();

    for (position, heading) in find_headings(document).into_iter().enumerate() {
        let index = position + 1;

        if !is_kanji_heading(&collapsed_text(heading)) {
            tracing::debug!(index, "heading without entry identifier, ignored");
            continue;
        }

        let Some(reading) = heading_reading(heading) else {
            warnings.push(format!("entry {index}: no reading found, skipped"));
            continue;
        };
        let reading = normalize_reading(&reading);

        let Some(card) = find_card(heading) else {
            warnings.push(format!("entry {index} ({reading}): no card image found, skipped"));
            continue;
        };

        let Some(image_url) = resolve_image_url(card.src, base) else {
            warnings.push(format!(
                "entry {index} ({reading}): unresolvable image source '{}', skipped",
                card.src
            ));
            continue;
        };

        entries.push(PageEntry {
            index,
            reading,
            image_url,
            additional_info: additional_info(card.info_div),
        });
    }

    (entries, warnings)
}
