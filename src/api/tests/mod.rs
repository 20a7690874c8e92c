use super::*;
use ::image::{DynamicImage, ImageOutputFormat, Rgba, RgbaImage};
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use serde_json::{Value, json};
use std::io::{Cursor, Read};
use std::path::Path;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};


fn sample_png() -> Vec<u8> {
    let img = RgbaImage::from_fn(12, 8, |x, _| Rgba([(x * 20) as u8, 40, 200, 255]));
    let mut out = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), ImageOutputFormat::Png)
        .unwrap();
    out
}

/// Write `bytes` under `dir` and return the path as a storage location
fn store(dir: &Path, name: &str, bytes: &[u8]) -> String {
    let file = dir.join(name);
    std::fs::write(&file, bytes).unwrap();
    file.to_string_lossy().into_owned()
}

/// A record as the metadata service serializes it
fn record(url: &str, filename: &str, unreadable: bool, annotator: &str) -> Value {
    json!({
        "_id": "5f1e9a",
        "PiFF": {
            "Meta": { "Type": "line", "URL": "" },
            "Location": [
                { "Type": "line", "Polygon": [[0, 0], [12, 0], [12, 8], [0, 8]], "Id": "loc_0" }
            ],
            "Data": [
                { "Type": "line", "LocationId": "loc_0", "Value": "hello", "Id": "0" }
            ],
            "Children": null,
            "Parent": 0
        },
        "Url": url,
        "Filename": filename,
        "Annotated": true,
        "Corrected": false,
        "SentToReco": false,
        "SentToUser": false,
        "Unreadable": unreadable,
        "Annotator": annotator
    })
}

async fn metadata_server(records: Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/db/retrieve/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records))
        .mount(&server)
        .await;
    server
}

fn config_for(metadata: &MockServer) -> Config {
    Config {
        database_api_url: metadata.uri(),
        ..Default::default()
    }
}

fn app_for(config: Config) -> Router {
    let exporter = Arc::new(Exporter::from_config(&config).unwrap());
    create_router(exporter)
}

async fn get(app: Router, uri: &str, credential: Option<&str>) -> Response {
    let mut request = Request::builder().uri(uri);
    if let Some(credential) = credential {
        request = request.header(header::AUTHORIZATION, credential);
    }
    app.oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

fn entry_names(archive: &[u8]) -> Vec<String> {
    let mut zip = zip::ZipArchive::new(Cursor::new(archive)).unwrap();
    (0..zip.len())
        .map(|i| zip.by_index(i).unwrap().name().to_string())
        .collect()
}

fn entry_bytes(archive: &[u8], name: &str) -> Vec<u8> {
    let mut zip = zip::ZipArchive::new(Cursor::new(archive)).unwrap();
    let mut file = zip.by_name(name).unwrap();
    let mut out = Vec::new();
    file.read_to_end(&mut out).unwrap();
    out
}

#[tokio::test]
async fn test_api_server_spawns() {
    let metadata = metadata_server(json!([])).await;
    let mut config = config_for(&metadata);
    config.bind_address = "127.0.0.1:0".parse().unwrap();
    let config = Arc::new(config);
    let exporter = Arc::new(Exporter::from_config(&config).unwrap());

    let api_handle = tokio::spawn(start_api_server(exporter, config));

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!api_handle.is_finished(), "server should still be running");
    api_handle.abort();
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let metadata = metadata_server(json!([])).await;
    let response = get(app_for(config_for(&metadata)), "/export/csv", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
