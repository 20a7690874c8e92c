//! Core types: PiFF annotation documents and picture records

use serde::{Deserialize, Deserializer, Serialize};

/// Annotator value written by the automatic recognizer
///
/// A record carrying this annotator was transcribed automatically and has not
/// been reviewed by a human yet.
pub const RECOGNIZER_ANNOTATOR: &str = "$taliesin_recognizer";

/// PiFF document header
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    /// Document type tag (e.g. "line")
    #[serde(rename = "Type", default)]
    pub kind: String,

    /// Source URL of the document, empty when unknown
    #[serde(rename = "URL", default)]
    pub url: String,
}

/// A polygonal region of the image
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Region type tag
    #[serde(rename = "Type", default)]
    pub kind: String,

    /// Closed polygon as `[x, y]` points
    #[serde(rename = "Polygon", default, deserialize_with = "null_as_empty")]
    pub polygon: Vec<[i64; 2]>,

    /// Identifier, unique within the document
    #[serde(rename = "Id", default)]
    pub id: String,
}

/// A transcription attached to a [`Location`]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Data {
    /// Data type tag
    #[serde(rename = "Type", default)]
    pub kind: String,

    /// Id of the [`Location`] this value belongs to
    #[serde(rename = "LocationId", default)]
    pub location_id: String,

    /// Transcribed text
    #[serde(rename = "Value", default)]
    pub value: String,

    /// Identifier, unique within the document
    #[serde(rename = "Id", default)]
    pub id: String,
}

/// PiFF annotation document
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiffDocument {
    /// Document header
    #[serde(rename = "Meta", default)]
    pub meta: Meta,

    /// Regions, in document order
    #[serde(rename = "Location", default, deserialize_with = "null_as_empty")]
    pub locations: Vec<Location>,

    /// Transcriptions, in document order
    #[serde(rename = "Data", default, deserialize_with = "null_as_empty")]
    pub data: Vec<Data>,

    /// Child document references
    #[serde(rename = "Children", default, deserialize_with = "null_as_empty")]
    pub children: Vec<i64>,

    /// Parent document reference, 0 for a root document
    #[serde(rename = "Parent", default)]
    pub parent: i64,
}

/// One exportable picture as returned by the metadata service
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PictureRecord {
    /// Opaque identifier assigned by the metadata service
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,

    /// Embedded annotation document
    #[serde(rename = "PiFF", default)]
    pub piff: PiffDocument,

    /// Storage location of the source image (path or URL)
    #[serde(rename = "Url", default)]
    pub url: String,

    /// Declared filename of the image, empty when not provided
    #[serde(rename = "Filename", default)]
    pub filename: String,

    /// Bookkeeping flag, not used by the export
    #[serde(rename = "Annotated", default)]
    pub annotated: bool,

    /// Bookkeeping flag, not used by the export
    #[serde(rename = "Corrected", default)]
    pub corrected: bool,

    /// Bookkeeping flag, not used by the export
    #[serde(rename = "SentToReco", default)]
    pub sent_to_reco: bool,

    /// Bookkeeping flag, not used by the export
    #[serde(rename = "SentToUser", default)]
    pub sent_to_user: bool,

    /// Marked as unreadable by a reviewer
    #[serde(rename = "Unreadable", default)]
    pub unreadable: bool,

    /// Who annotated the picture: empty, [`RECOGNIZER_ANNOTATOR`], or a user
    #[serde(rename = "Annotator", default)]
    pub annotator: String,
}

/// Role resolved from a credential by the authorization service
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role(pub String);

impl Role {
    /// Role name as reported by the authorization service
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Upstream encodes empty collections as `null`
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
