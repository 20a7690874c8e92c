//! Archive assembly

use super::category::Folder;
use super::document::{PIFF_EXTENSION, serialize_piff};
use super::naming::{NameAllocator, base_name};
use super::normalize::normalize_image;
use super::source::ImageSource;
use crate::error::{Error, Result};
use crate::types::PictureRecord;
use std::io::{Cursor, Write};
use std::sync::Arc;
use tracing::{debug, info};
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::FileOptions;

/// A file to be written into the archive
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Path inside the archive, `/`-separated
    pub path: String,
    /// File content
    pub content: Vec<u8>,
    /// Store without compression (content is already compressed)
    pub stored: bool,
}

/// In-memory zip writer receiving entries one at a time
///
/// Each entry's content is released as soon as it is written, so only the
/// archive itself and the entry in hand are held at once.
pub struct ArchiveWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    entries: usize,
}

impl Default for ArchiveWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveWriter {
    /// Start an empty archive
    pub fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            entries: 0,
        }
    }

    /// Append `entry` after the entries already written
    pub fn add(&mut self, entry: ArchiveEntry) -> Result<()> {
        let method = if entry.stored {
            CompressionMethod::Stored
        } else {
            CompressionMethod::Deflated
        };
        let options = FileOptions::default().compression_method(method);
        self.zip.start_file(entry.path.as_str(), options)?;
        self.zip
            .write_all(&entry.content)
            .map_err(|e| Error::ArchiveWrite(e.into()))?;
        self.entries += 1;
        Ok(())
    }

    /// Number of entries written so far
    pub fn entry_count(&self) -> usize {
        self.entries
    }

    /// Write the central directory and return the archive bytes
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let cursor = self.zip.finish()?;
        Ok(cursor.into_inner())
    }
}

/// Builds the export archive from an ordered list of records
///
/// Each record yields two entries, its PiFF document followed by its image,
/// in input order. The first failing record aborts the build and the partly
/// written archive is dropped.
#[derive(Clone)]
pub struct ArchiveBuilder {
    source: Arc<dyn ImageSource>,
}

impl ArchiveBuilder {
    /// Create a builder reading images through `source`
    pub fn new(source: Arc<dyn ImageSource>) -> Self {
        Self { source }
    }

    /// Build the archive and return its bytes
    pub async fn build(&self, records: &[PictureRecord]) -> Result<Vec<u8>> {
        let mut names = NameAllocator::new();
        let mut writer = ArchiveWriter::new();

        for record in records {
            self.add_record(&mut writer, &mut names, record).await?;
        }

        let entries = writer.entry_count();
        let archive = writer.finish()?;
        info!(
            records = records.len(),
            entries,
            bytes = archive.len(),
            "archive built"
        );
        Ok(archive)
    }

    async fn add_record(
        &self,
        writer: &mut ArchiveWriter,
        names: &mut NameAllocator,
        record: &PictureRecord,
    ) -> Result<()> {
        let folder = Folder::classify(record);
        let name = names.allocate(folder, &base_name(record));
        let stem = format!("{}{}", folder.prefix(), name);

        debug!(entry = %stem, location = %record.url, "adding record");

        writer.add(ArchiveEntry {
            path: format!("{}.{}", stem, PIFF_EXTENSION),
            content: serialize_piff(&record.piff)?,
            stored: false,
        })?;

        let raw = self.source.read(&record.url).await?;
        let image = normalize_image(&raw)?;
        writer.add(ArchiveEntry {
            path: format!("{}.{}", stem, image.extension()),
            content: image.bytes,
            stored: true,
        })
    }
}
