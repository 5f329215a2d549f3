//! Full scrape runs against a mock wiki server.

use std::fs;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use kanji_scraper::mappings::read_mappings;
use kanji_scraper::scrape::{run_scrape, PageSource};
use kanji_scraper::ScrapeError;

const PAGE: &str = r#"<!DOCTYPE html>
<html><body>
<h3>ID:0001<!-- a -->　あや<span style="color:#F54738;">しい</span></h3>
<div><img src="attach/16/1/ID071.png">部首は「りっしんべん」</div>
<h3>ID:0002<!-- b -->　ぼん等</h3>
<div><img src="attach/16/2/ID072.png"></div>
<h3>ID:0003<!-- c -->　ゆう</h3>
<div><img src="attach/16/3/missing.png"></div>
</body></html>"#;

const PNG: &[u8] = b"\x89PNG\r\n\x1a\nfakeimagedata";

/// Serve the fixture page and two of its three images; keep the runtime
/// alive so the server keeps answering the blocking client.
fn start_server(rt: &tokio::runtime::Runtime) -> MockServer {
    rt.block_on(async {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/yuia_sk/pages/16.html"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(PAGE, "text/html; charset=utf-8"),
            )
            .mount(&server)
            .await;

        for image in ["/yuia_sk/pages/attach/16/1/ID071.png", "/yuia_sk/pages/attach/16/2/ID072.png"] {
            Mock::given(method("GET"))
                .and(path(image))
                .respond_with(ResponseTemplate::new(200).set_body_raw(PNG, "image/png"))
                .mount(&server)
                .await;
        }

        Mock::given(method("GET"))
            .and(path("/yuia_sk/pages/attach/16/3/missing.png"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        server
    })
}

#[test]
fn scrape_writes_images_and_csv() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let server = start_server(&rt);

    let source = PageSource::from_arg(&format!("{}/yuia_sk/pages/16.html", server.uri())).unwrap();
    let output = tempfile::tempdir().unwrap();

    let report = run_scrape(&source, output.path()).unwrap();

    // Two images downloaded, the 404 one skipped with a warning.
    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("image download failed"));

    assert_eq!(
        fs::read(output.path().join("images/1_あやしい.png")).unwrap(),
        PNG
    );
    assert!(output.path().join("images/2_ぼん.png").is_file());

    let rows = read_mappings(&output.path().join("mappings.csv")).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].path, "images/1_あやしい.png");
    assert_eq!(rows[0].reading, "あや'しい'");
    assert_eq!(rows[0].additional_info, "部首は「りっしんべん」");
    assert_eq!(rows[1].path, "images/2_ぼん.png");
    assert_eq!(rows[1].reading, "ぼん");
}

#[test]
fn scrape_fails_when_no_images_survive() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let server = rt.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pages/17.html"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"<h3>ID:0001<!-- a -->　あや</h3><div><img src="attach/1.png"></div>"#,
                "text/html; charset=utf-8",
            ))
            .mount(&server)
            .await;
        // No image mock: every download 404s.
        server
    });

    let source = PageSource::from_arg(&format!("{}/pages/17.html", server.uri())).unwrap();
    let output = tempfile::tempdir().unwrap();

    let err = run_scrape(&source, output.path()).unwrap_err();
    assert!(matches!(err, ScrapeError::NoEntries));
    assert!(!output.path().join("mappings.csv").exists());
}

#[test]
fn scrape_fails_on_heading_free_page() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let server = rt.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pages/empty.html"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("<html><body><p>nothing here</p></body></html>", "text/html"),
            )
            .mount(&server)
            .await;
        server
    });

    let source = PageSource::from_arg(&format!("{}/pages/empty.html", server.uri())).unwrap();
    let output = tempfile::tempdir().unwrap();

    let err = run_scrape(&source, output.path()).unwrap_err();
    assert!(matches!(err, ScrapeError::NoHeadings));
}

#[test]
fn scrape_reads_saved_page_with_absolute_image_urls() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let server = rt.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/attach/16/1/ID071.png"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(PNG, "image/png"))
            .mount(&server)
            .await;
        server
    });

    // A page saved from the browser: image URLs already absolute.
    let page = format!(
        r#"<h3>ID:0001<!-- a -->　あや</h3><div><img src="{}/attach/16/1/ID071.png"></div>"#,
        server.uri()
    );
    let dir = tempfile::tempdir().unwrap();
    let page_path = dir.path().join("page_16.html");
    fs::write(&page_path, page).unwrap();

    let source = PageSource::from_arg(page_path.to_str().unwrap()).unwrap();
    let output = tempfile::tempdir().unwrap();

    let report = run_scrape(&source, output.path()).unwrap();
    assert_eq!(report.rows.len(), 1);
    assert!(output.path().join("images/1_あや.png").is_file());
}

#[test]
fn scrape_404_page_is_a_fetch_error() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let server = rt.block_on(MockServer::start());

    let source = PageSource::from_arg(&format!("{}/pages/missing.html", server.uri())).unwrap();
    let output = tempfile::tempdir().unwrap();

    let err = run_scrape(&source, output.path()).unwrap_err();
    assert!(matches!(err, ScrapeError::PageFetch { .. }));
}
