//! The persisted tag/pin data structure.

use std::collections::BTreeMap;

/// Persisted sticker metadata: filename → tags, plus the pinned set.
///
/// Tags keep their insertion order within a file and contain no duplicates.
/// `pinned` keeps insertion order as well; membership is what matters, the
/// order is only preserved for compatibility with older clients that relied
/// on it.
///
/// Filenames appearing here normally correspond to real files in the storage
/// directory, but the store does not enforce that. Entries for files deleted
/// outside the API are tolerated and ignored by listing logic; cleanup on
/// delete is the caller's job via [`crate::MetadataStore::forget`].
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TagStore {
    /// Mapping from filename to its ordered tag list
    #[serde(default)]
    pub files: BTreeMap<String, Vec<String>>,

    /// Filenames promoted to the front of listings, in pin order
    #[serde(default)]
    pub pinned: Vec<String>,
}

impl TagStore {
    /// Returns the tags for `filename`, empty if the file is unknown.
    pub fn tags(&self, filename: &str) -> &[String] {
        self.files.get(filename).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns whether `filename` is pinned.
    pub fn is_pinned(&self, filename: &str) -> bool {
        self.pinned.iter().any(|name| name == filename)
    }
}
