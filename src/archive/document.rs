//! PiFF document encoding for archive entries

use crate::error::Result;
use crate::types::PiffDocument;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

/// File extension of archived PiFF documents
pub const PIFF_EXTENSION: &str = "piff";

/// Encode a PiFF document as four-space indented JSON
///
/// Only the document is written; record-level fields such as the image
/// location or review flags never end up in the archive.
pub fn serialize_piff(document: &PiffDocument) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut out, formatter);
    document.serialize(&mut serializer)?;
    Ok(out)
}
