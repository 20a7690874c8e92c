//! End-to-end tests of the export API over a real TCP listener
//!
//! The metadata service, the authorization service and remote image storage
//! are wiremock servers; local images live in a temp dir.

mod common;

use common::{TestServer, entry, entry_names, jpeg_page, metadata_with, picture, png_page};
use piff_export::{Config, PiffDocument};
use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(metadata: &MockServer) -> Config {
    Config {
        database_api_url: metadata.uri(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_export_mixed_storage_and_formats() {
    let storage = MockServer::start().await;
    let jpeg = jpeg_page();
    Mock::given(method("GET"))
        .and(path("/images/letter-041.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(jpeg.clone()))
        .mount(&storage)
        .await;

    let dir = tempdir().unwrap();
    let png_path = dir.path().join("ledger.png");
    std::fs::write(&png_path, png_page()).unwrap();
    let png_url = url::Url::from_file_path(&png_path).unwrap().to_string();

    let metadata = metadata_with(json!([
        picture(
            &format!("{}/images/letter-041.jpg", storage.uri()),
            "",
            false,
            "reviewer",
            "Dear Sir"
        ),
        picture(&png_url, "ledger.png", false, "", "1832"),
    ]))
    .await;

    let server = TestServer::start(config_for(&metadata)).await;
    let response = reqwest::get(server.url("/export/piff")).await.unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "application/zip"
    );
    let archive = response.bytes().await.unwrap().to_vec();

    assert_eq!(
        entry_names(&archive),
        vec![
            "letter-041.piff",
            "letter-041.jpg",
            "Unannotated/ledger.piff",
            "Unannotated/ledger.png",
        ]
    );

    // JPEG pages are carried over byte for byte
    assert_eq!(entry(&archive, "letter-041.jpg"), jpeg);

    let document: PiffDocument =
        serde_json::from_slice(&entry(&archive, "Unannotated/ledger.piff")).unwrap();
    assert_eq!(document.data[0].value, "1832");

    let exported = image::load_from_memory(&entry(&archive, "Unannotated/ledger.png")).unwrap();
    let original = image::load_from_memory(&png_page()).unwrap();
    assert_eq!(exported.to_rgb8(), original.to_rgb8());
}

#[tokio::test]
async fn test_repeated_exports_are_identical() {
    let dir = tempdir().unwrap();
    let page = dir.path().join("page.png");
    std::fs::write(&page, png_page()).unwrap();
    let location = page.to_string_lossy().into_owned();

    let metadata = metadata_with(json!([
        picture(&location, "page.png", false, "someone", "a"),
        picture(&location, "page.png", false, "someone", "b"),
        picture(&location, "page.png", true, "someone", "c"),
    ]))
    .await;
    let server = TestServer::start(config_for(&metadata)).await;

    let (first, second) = tokio::join!(
        reqwest::get(server.url("/export/piff")),
        reqwest::get(server.url("/export/piff"))
    );
    let first = first.unwrap().bytes().await.unwrap();
    let second = second.unwrap().bytes().await.unwrap();

    let expected = vec![
        "page.piff",
        "page.png",
        "page_2.piff",
        "page_2.png",
        "Unreadable/page.piff",
        "Unreadable/page.png",
    ];
    assert_eq!(entry_names(&first), expected);
    assert_eq!(entry_names(&second), expected);
}

#[tokio::test]
async fn test_role_gated_server() {
    let metadata = metadata_with(json!([])).await;
    let auth = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/role"))
        .and(header("Authorization", "Bearer archivist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Role": "archivist"})))
        .mount(&auth)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/role"))
        .and(header("Authorization", "Bearer expired"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&auth)
        .await;

    let mut config = config_for(&metadata);
    config.auth_api_url = Some(auth.uri());
    config.admin_role = "archivist".to_string();
    let server = TestServer::start(config).await;
    let client = reqwest::Client::new();

    let missing = client.get(server.url("/export/piff")).send().await.unwrap();
    assert_eq!(missing.status().as_u16(), 400);

    let expired = client
        .get(server.url("/export/piff"))
        .header("Authorization", "Bearer expired")
        .send()
        .await
        .unwrap();
    assert_eq!(expired.status().as_u16(), 401);
    assert!(expired.text().await.unwrap().starts_with("[MICRO-EXPORT] "));

    let allowed = client
        .get(server.url("/export/piff"))
        .header("Authorization", "Bearer archivist")
        .send()
        .await
        .unwrap();
    assert_eq!(allowed.status().as_u16(), 200);
    assert!(entry_names(&allowed.bytes().await.unwrap()).is_empty());
}

#[tokio::test]
async fn test_unreachable_metadata_service() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let config = Config {
        database_api_url: format!("http://{}", address),
        ..Default::default()
    };
    let server = TestServer::start(config).await;
    let response = reqwest::get(server.url("/export/piff")).await.unwrap();

    assert_eq!(response.status().as_u16(), 500);
    let body = response.text().await.unwrap();
    assert!(body.starts_with("[MICRO-EXPORT] upstream unavailable"), "got {body}");
}

#[tokio::test]
async fn test_unsupported_image_format() {
    let dir = tempdir().unwrap();
    let gif = dir.path().join("scan.gif");
    std::fs::write(&gif, b"GIF89a\x01\x00\x01\x00\x00\x00\x00;").unwrap();

    let metadata = metadata_with(json!([picture(
        &gif.to_string_lossy(),
        "scan.gif",
        false,
        "someone",
        "x"
    )]))
    .await;
    let server = TestServer::start(config_for(&metadata)).await;
    let response = reqwest::get(server.url("/export/piff")).await.unwrap();

    assert_eq!(response.status().as_u16(), 500);
    assert_eq!(
        response.text().await.unwrap(),
        "[MICRO-EXPORT] couldn't handle format gif"
    );
}
