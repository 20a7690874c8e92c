//! Review-status folders

use crate::types::{PictureRecord, RECOGNIZER_ANNOTATOR};

/// Archive folder a record is filed under
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Folder {
    /// Reviewed by a human annotator, stored at the archive root
    Reviewed,
    /// Marked as unreadable
    Unreadable,
    /// Transcribed by the recognizer, not yet corrected
    Uncorrected,
    /// Never annotated
    Unannotated,
}

impl Folder {
    /// Classify a record by its review status
    ///
    /// `unreadable` wins over any annotator value.
    pub fn classify(record: &PictureRecord) -> Self {
        if record.unreadable {
            Folder::Unreadable
        } else if record.annotator == RECOGNIZER_ANNOTATOR {
            Folder::Uncorrected
        } else if record.annotator.is_empty() {
            Folder::Unannotated
        } else {
            Folder::Reviewed
        }
    }

    /// Path prefix for entries in this folder, including the trailing `/`
    pub fn prefix(self) -> &'static str {
        match self {
            Folder::Reviewed => "",
            Folder::Unreadable => "Unreadable/",
            Folder::Uncorrected => "Uncorrected/",
            Folder::Unannotated => "Unannotated/",
        }
    }
}
