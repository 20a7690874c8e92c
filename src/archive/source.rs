//! Reading source images from their storage location

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::path::Path;
use url::Url;

/// Provides the raw bytes of a record's source image
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Read the image stored at `location`
    ///
    /// Any failure is reported as [`Error::ImageRead`].
    async fn read(&self, location: &str) -> Result<Vec<u8>>;
}

/// Reads images from the shared filesystem or over HTTP(S)
///
/// Plain paths and `file://` URLs are read from disk, `http://` and `https://`
/// URLs are fetched with the shared client.
#[derive(Clone, Debug)]
pub struct StorageReader {
    client: reqwest::Client,
}

impl StorageReader {
    /// Create a reader using `client` for remote locations
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn read_local(&self, location: &str, path: &Path) -> Result<Vec<u8>> {
        tokio::fs::read(path)
            .await
            .map_err(|e| Error::image_read(location, e))
    }

    async fn read_remote(&self, location: &str, url: Url) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::image_read(location, e))?;

        if !response.status().is_success() {
            return Err(Error::image_read(
                location,
                format!("HTTP status {}", response.status()),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::image_read(location, e))?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl ImageSource for StorageReader {
    async fn read(&self, location: &str) -> Result<Vec<u8>> {
        if location.trim().is_empty() {
            return Err(Error::image_read(location, "empty storage location"));
        }

        match Url::parse(location) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {
                self.read_remote(location, url).await
            }
            Ok(url) if url.scheme() == "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|_| Error::image_read(location, "invalid file URL"))?;
                self.read_local(location, &path).await
            }
            _ => self.read_local(location, Path::new(location)).await,
        }
    }
}
