//! End-to-end tests for page parsing and CSV generation, driven by a saved
//! wiki page fixture.

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use scraper::Html;
use url::Url;

use kanji_scraper::mappings::{read_mappings, write_mappings, MappingRow};
use kanji_scraper::page::{find_headings, parse_entries};

/// Load fixture file content.
fn load_fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to load {}: {}", path.display(), e))
}

fn parse_fixture() -> (Vec<kanji_scraper::page::PageEntry>, Vec<String>) {
    let html = load_fixture("level7.html");
    let document = Html::parse_document(&html);
    let base = Url::parse("https://w.example.jp/yuia_sk/pages/16.html").unwrap();
    parse_entries(&document, Some(&base))
}

#[test]
fn fixture_headings_include_non_entries() {
    let html = load_fixture("level7.html");
    let document = Html::parse_document(&html);
    assert_eq!(find_headings(&document).len(), 6);
}

#[test]
fn fixture_yields_three_entries() {
    let (entries, warnings) = parse_fixture();

    let summary: Vec<(usize, &str)> = entries
        .iter()
        .map(|e| (e.index, e.reading.as_str()))
        .collect();
    assert_eq!(summary, vec![(1, "あや'しい'"), (3, "おも'う'"), (4, "ぼん")]);

    // ID:0004 has a placeholder reading, ID:0005 has no image.
    assert_eq!(warnings.len(), 2);
    assert!(warnings[0].contains("entry 5"));
    assert!(warnings[0].contains("no reading"));
    assert!(warnings[1].contains("entry 6"));
    assert!(warnings[1].contains("no card image"));
}

#[test]
fn fixture_image_urls_are_resolved() {
    let (entries, _) = parse_fixture();

    // Protocol-relative src.
    assert_eq!(
        entries[0].image_url.as_str(),
        "https://img.example.jp/yuia_sk/attach/16/55/ID071.png"
    );
    // Absolute src.
    assert_eq!(
        entries[1].image_url.as_str(),
        "https://img.example.jp/yuia_sk/attach/16/14/ID072.png"
    );
    // Relative src, joined against the page URL.
    assert_eq!(
        entries[2].image_url.as_str(),
        "https://w.example.jp/yuia_sk/pages/attach/16/227/ID073.jpg"
    );
}

#[test]
fn fixture_additional_info_comes_from_the_image_div() {
    let (entries, _) = parse_fixture();

    assert_eq!(entries[0].additional_info, "部首は「りっしんべん」");
    // Entry 2's image sits in a <p>, so there is no notes container.
    assert_eq!(entries[1].additional_info, "");
    // Comment fragments inside the div never leak into the notes.
    assert_eq!(entries[2].additional_info, "よく出るので注意");
}

#[test]
fn fixture_image_filenames_follow_index_and_reading() {
    let (entries, _) = parse_fixture();

    let names: Vec<String> = entries.iter().map(|e| e.image_filename()).collect();
    assert_eq!(
        names,
        vec!["1_あやしい.png", "3_おもう.png", "4_ぼん.jpg"]
    );
}

#[test]
fn fixture_rows_roundtrip_through_csv() {
    let (entries, _) = parse_fixture();
    let rows: Vec<MappingRow> = entries
        .iter()
        .map(|e| MappingRow {
            path: format!("images/{}", e.image_filename()),
            reading: e.reading.clone(),
            additional_info: e.additional_info.clone(),
        })
        .collect();

    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("mappings.csv");
    write_mappings(&csv_path, &rows).unwrap();

    let content = fs::read_to_string(&csv_path).unwrap();
    assert!(content.starts_with("path,reading,additional_info\n"));
    assert!(content.contains("images/1_あやしい.png,あや'しい',部首は「りっしんべん」"));

    let loaded = read_mappings(&csv_path).unwrap();
    assert_eq!(loaded, rows);
}

#[test]
fn fixture_parse_is_idempotent() {
    let (first, first_warnings) = parse_fixture();
    let (second, second_warnings) = parse_fixture();
    assert_eq!(first, second);
    assert_eq!(first_warnings, second_warnings);
}
