//! Entry naming: base-name derivation and per-export collision handling

use super::category::Folder;
use crate::types::PictureRecord;
use std::collections::{HashMap, HashSet};
use url::Url;

/// Base name used when neither the filename nor the storage location yields one
pub const FALLBACK_NAME: &str = "unnamed";

/// Derive the entry base name of a record
///
/// The declared filename wins when present; otherwise the last segment of the
/// storage location is used. Only the final path component is kept and its
/// extension (from the last `.` on) is stripped.
pub fn base_name(record: &PictureRecord) -> String {
    let file_name = if record.filename.is_empty() {
        location_file_name(&record.url)
    } else {
        last_component(&record.filename).to_string()
    };

    let stem = strip_extension(&file_name);
    if stem.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        stem.to_string()
    }
}

fn location_file_name(location: &str) -> String {
    if let Ok(url) = Url::parse(location) {
        if matches!(url.scheme(), "http" | "https" | "file") {
            return url
                .path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
                .unwrap_or_default();
        }
    }
    last_component(location).to_string()
}

fn last_component(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

fn strip_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(dot) => &file_name[..dot],
        None => file_name,
    }
}

/// Hands out collision-free names within one export
///
/// The n-th request for the same `(folder, base)` pair gets `base` for n = 1 and
/// `base_n` afterwards. A candidate already handed out for a different base in
/// the same folder is skipped by bumping that pair's counter again, so no two
/// names returned for one folder are ever equal.
#[derive(Debug, Default)]
pub struct NameAllocator {
    occurrences: HashMap<(Folder, String), usize>,
    taken: HashSet<(Folder, String)>,
}

impl NameAllocator {
    /// Create an allocator with no names handed out
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a name for `base` that is unique within `folder`
    pub fn allocate(&mut self, folder: Folder, base: &str) -> String {
        let counter = self
            .occurrences
            .entry((folder, base.to_string()))
            .or_insert(0);

        loop {
            *counter += 1;
            let candidate = if *counter == 1 {
                base.to_string()
            } else {
                format!("{}_{}", base, counter)
            };

            if self.taken.insert((folder, candidate.clone())) {
                return candidate;
            }
        }
    }
}
