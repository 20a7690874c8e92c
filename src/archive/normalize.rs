//! Image normalization
//!
//! The source encoding is sniffed from the bytes, never from a filename.
//! Only JPEG and PNG are exported:
//! - PNG is decoded and re-encoded, which is lossless
//! - JPEG is decoded to prove it is intact, then the source bytes are kept

use crate::error::{Error, Result};
use ::image::{ImageFormat, ImageOutputFormat};
use std::io::Cursor;

/// Image encodings the export handles
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageKind {
    /// Lossy JPEG
    Jpeg,
    /// Lossless PNG
    Png,
}

impl ImageKind {
    /// Detect the encoding from the leading bytes
    ///
    /// Unrecognised bytes are a decode error; recognised formats other than
    /// JPEG and PNG are unsupported.
    pub fn sniff(bytes: &[u8]) -> Result<Self> {
        let format = ::image::guess_format(bytes).map_err(|e| Error::decode("image", e))?;
        match format {
            ImageFormat::Jpeg => Ok(ImageKind::Jpeg),
            ImageFormat::Png => Ok(ImageKind::Png),
            other => Err(Error::UnsupportedFormat(
                format!("{:?}", other).to_lowercase(),
            )),
        }
    }

    /// Archive file extension for this encoding
    pub fn extension(self) -> &'static str {
        match self {
            ImageKind::Jpeg => "jpg",
            ImageKind::Png => "png",
        }
    }

    fn format(self) -> ImageFormat {
        match self {
            ImageKind::Jpeg => ImageFormat::Jpeg,
            ImageKind::Png => ImageFormat::Png,
        }
    }
}

/// An image ready to be written into the archive
#[derive(Debug)]
pub struct NormalizedImage {
    /// Encoded image bytes
    pub bytes: Vec<u8>,
    /// Encoding of `bytes`
    pub kind: ImageKind,
}

impl NormalizedImage {
    /// Archive file extension matching the encoding
    pub fn extension(&self) -> &'static str {
        self.kind.extension()
    }
}

/// Decode `raw` and produce its archived encoding
pub fn normalize_image(raw: &[u8]) -> Result<NormalizedImage> {
    let kind = ImageKind::sniff(raw)?;
    let decoded = ::image::load_from_memory_with_format(raw, kind.format())
        .map_err(|e| Error::decode("image", e))?;

    let bytes = match kind {
        ImageKind::Jpeg => raw.to_vec(),
        ImageKind::Png => {
            let mut out = Vec::with_capacity(raw.len());
            decoded
                .write_to(&mut Cursor::new(&mut out), ImageOutputFormat::Png)
                .map_err(|e| Error::decode("image", format!("PNG re-encoding failed: {}", e)))?;
            out
        }
    };

    tracing::trace!(
        kind = ?kind,
        width = decoded.width(),
        height = decoded.height(),
        "normalized image"
    );

    Ok(NormalizedImage { bytes, kind })
}
