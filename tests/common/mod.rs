//! Common test utilities for piff-export integration tests

#![allow(dead_code)]

use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
use piff_export::{Config, Exporter, api};
use serde_json::{Value, json};
use std::io::{Cursor, Read};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A running export API bound to an ephemeral port
pub struct TestServer {
    pub address: SocketAddr,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Serve the router built from `config` on 127.0.0.1
    pub async fn start(config: Config) -> Self {
        let exporter = Arc::new(Exporter::from_config(&config).unwrap());
        let app = api::create_router(exporter);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { address, handle }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.address, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Metadata service answering `records` on the retrieve-all route
pub async fn metadata_with(records: Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/db/retrieve/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(records))
        .mount(&server)
        .await;
    server
}

/// A picture record in the metadata service's wire format
pub fn picture(url: &str, filename: &str, unreadable: bool, annotator: &str, text: &str) -> Value {
    json!({
        "PiFF": {
            "Meta": { "Type": "line", "URL": "" },
            "Location": [
                { "Type": "line", "Polygon": [[0, 0], [16, 0], [16, 16], [0, 16]], "Id": "loc_0" }
            ],
            "Data": [
                { "Type": "line", "LocationId": "loc_0", "Value": text, "Id": "0" }
            ],
            "Children": [],
            "Parent": 0
        },
        "Url": url,
        "Filename": filename,
        "Annotated": !annotator.is_empty(),
        "Corrected": false,
        "SentToReco": false,
        "SentToUser": false,
        "Unreadable": unreadable,
        "Annotator": annotator
    })
}

pub fn jpeg_page() -> Vec<u8> {
    let img = RgbImage::from_fn(16, 16, |x, y| Rgb([(x * 15) as u8, (y * 15) as u8, 128]));
    let mut out = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut out), ImageOutputFormat::Jpeg(90))
        .unwrap();
    out
}

pub fn png_page() -> Vec<u8> {
    let img = RgbImage::from_fn(16, 16, |x, y| Rgb([255 - (x * 10) as u8, (y * 10) as u8, 0]));
    let mut out = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut out), ImageOutputFormat::Png)
        .unwrap();
    out
}

/// Entry names of a zip archive, in archive order
pub fn entry_names(archive: &[u8]) -> Vec<String> {
    let mut zip = zip::ZipArchive::new(Cursor::new(archive)).unwrap();
    (0..zip.len())
        .map(|i| zip.by_index(i).unwrap().name().to_string())
        .collect()
}

/// Content of the named zip entry
pub fn entry(archive: &[u8], name: &str) -> Vec<u8> {
    let mut zip = zip::ZipArchive::new(Cursor::new(archive)).unwrap();
    let mut file = zip.by_name(name).unwrap();
    let mut out = Vec::new();
    file.read_to_end(&mut out).unwrap();
    out
}
