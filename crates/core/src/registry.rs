//! The file registry service.
//!
//! Reconciles the sticker storage directory with the metadata store and
//! implements the product operations. The filesystem is the source of truth
//! for which stickers exist; the metadata store only decorates them with tags
//! and pin state. Stale metadata (a file removed outside the API) is
//! tolerated and simply never shows up in listings.

use crate::{CoreConfig, RegistryError, RegistryResult};
use std::cmp::Ordering;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use stickerbox_store::MetadataStore;
use stickerbox_types::NonEmptyText;

/// A sticker as presented to clients: filesystem facts joined with metadata.
///
/// Computed fresh on every listing request; never persisted.
#[derive(Debug, Clone, PartialEq, serde::Serialize, utoipa::ToSchema)]
pub struct StoredFile {
    /// Filename within the storage directory
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Last-modified time as epoch seconds
    pub modified: f64,
    /// Tags attached to this sticker, in insertion order
    pub tags: Vec<String>,
    /// Whether the sticker is pinned to the front of listings
    pub pinned: bool,
}

/// Use-case layer between the filesystem and the metadata store.
pub struct RegistryService {
    cfg: Arc<CoreConfig>,
    store: MetadataStore,
}

impl RegistryService {
    /// Creates a service over the configured storage directory and tag store.
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        let store = MetadataStore::with_json_file(cfg.tags_file());
        Self { cfg, store }
    }

    /// Creates a service with an explicit metadata store (alternate backend).
    pub fn with_store(cfg: Arc<CoreConfig>, store: MetadataStore) -> Self {
        Self { cfg, store }
    }

    /// The metadata store backing this service.
    pub fn store(&self) -> &MetadataStore {
        &self.store
    }

    /// Lists every regular file in the storage directory with its metadata.
    ///
    /// Pinned stickers come first; within each group the most recently
    /// modified sticker leads, with equal timestamps broken by filename so
    /// the order is deterministic across calls.
    pub fn list_files(&self) -> RegistryResult<Vec<StoredFile>> {
        let snapshot = self.store.snapshot();
        let mut files = Vec::new();

        for entry in fs::read_dir(self.cfg.stickers_dir())? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                tracing::warn!("skipping non-UTF-8 filename in storage directory");
                continue;
            };
            let meta = entry.metadata()?;
            files.push(StoredFile {
                size: meta.len(),
                modified: epoch_seconds(meta.modified().unwrap_or(UNIX_EPOCH)),
                tags: snapshot.tags(&name).to_vec(),
                pinned: snapshot.is_pinned(&name),
                name,
            });
        }

        files.sort_by(listing_order);
        Ok(files)
    }

    /// Returns the union of every tag across all stickers, sorted and
    /// deduplicated.
    pub fn list_all_tags(&self) -> Vec<String> {
        let snapshot = self.store.snapshot();
        let mut tags: Vec<String> = snapshot
            .files
            .values()
            .flatten()
            .cloned()
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect();
        tags.sort();
        tags
    }

    /// Attaches `tag` to `filename`. Idempotent.
    pub fn add_tag(&self, filename: &str, tag: &str) -> RegistryResult<()> {
        let name = validate_filename(filename)?;
        let tag = validate_tag(tag)?;
        self.require_file(&name)?;
        self.store.add_tag(&name, tag.as_str())?;
        Ok(())
    }

    /// Detaches `tag` from `filename`. Idempotent.
    pub fn remove_tag(&self, filename: &str, tag: &str) -> RegistryResult<()> {
        let name = validate_filename(filename)?;
        let tag = validate_tag(tag)?;
        self.require_file(&name)?;
        self.store.remove_tag(&name, tag.as_str())?;
        Ok(())
    }

    /// Flips the pinned state of `filename`, returning the new state.
    pub fn toggle_pin(&self, filename: &str) -> RegistryResult<bool> {
        let name = validate_filename(filename)?;
        self.require_file(&name)?;
        Ok(self.store.toggle_pin(&name)?)
    }

    /// Writes each `(filename, bytes)` pair into the storage directory,
    /// returning the filenames that were stored.
    ///
    /// Uploading under an existing name overwrites the previous content;
    /// tags and pin state stay attached to the name. Each file is written
    /// independently through a temporary file and rename, so a failed write
    /// neither aborts the rest of the batch nor leaves a truncated file
    /// under its final name. Failed files are absent from the returned list.
    pub fn upload_files(&self, files: Vec<(String, Vec<u8>)>) -> RegistryResult<Vec<String>> {
        let mut accepted = Vec::new();
        let mut last_error: Option<RegistryError> = None;

        for (filename, bytes) in files {
            let name = match validate_filename(&filename) {
                Ok(name) => name,
                Err(e) => {
                    tracing::warn!("rejecting upload {filename:?}: {e}");
                    last_error = Some(e);
                    continue;
                }
            };
            match self.write_sticker(&name, &bytes) {
                Ok(()) => accepted.push(name),
                Err(e) => {
                    tracing::warn!("failed to store upload {name:?}: {e}");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if accepted.is_empty() => Err(e),
            _ => Ok(accepted),
        }
    }

    /// Deletes `filename` from storage and forgets its metadata.
    ///
    /// The unlink and the metadata cleanup are not transactional: if the
    /// cleanup fails after a successful unlink the stale entries are logged
    /// and tolerated, matching the data model's invariant.
    pub fn delete_file(&self, filename: &str, supplied_password: &str) -> RegistryResult<()> {
        if supplied_password != self.cfg.delete_password() {
            return Err(RegistryError::Unauthorized);
        }

        let name = validate_filename(filename)?;
        let path = self.require_file(&name)?;
        fs::remove_file(&path)?;

        if let Err(e) = self.store.forget(&name) {
            tracing::warn!("deleted {name:?} but could not clean its metadata: {e}");
        }
        Ok(())
    }

    fn require_file(&self, name: &str) -> RegistryResult<PathBuf> {
        let path = self.cfg.stickers_dir().join(name);
        if !path.is_file() {
            return Err(RegistryError::NotFound(name.to_owned()));
        }
        Ok(path)
    }

    fn write_sticker(&self, name: &str, bytes: &[u8]) -> RegistryResult<()> {
        let final_path = self.cfg.stickers_dir().join(name);
        let temp_path = self.cfg.stickers_dir().join(format!("{name}.part"));

        if let Err(e) = fs::write(&temp_path, bytes) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&temp_path, &final_path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
        Ok(())
    }
}

impl std::fmt::Debug for RegistryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryService")
            .field("stickers_dir", &self.cfg.stickers_dir())
            .finish_non_exhaustive()
    }
}

/// Total order for listings: pinned before unpinned, then newest first,
/// then filename ascending as the deterministic tie-break.
fn listing_order(a: &StoredFile, b: &StoredFile) -> Ordering {
    b.pinned
        .cmp(&a.pinned)
        .then(b.modified.partial_cmp(&a.modified).unwrap_or(Ordering::Equal))
        .then_with(|| a.name.cmp(&b.name))
}

fn epoch_seconds(time: SystemTime) -> f64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Validates that `input` is a non-empty, plain filename.
///
/// Anything with path separators, `.`/`..` components, or an absolute form
/// is rejected so a request body can never escape the storage directory.
fn validate_filename(input: &str) -> RegistryResult<String> {
    let text = NonEmptyText::new(input)
        .map_err(|_| RegistryError::InvalidInput("filename cannot be empty".into()))?;

    let mut components = Path::new(text.as_str()).components();
    let is_plain = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !is_plain || text.as_str().contains(['/', '\\']) {
        return Err(RegistryError::InvalidInput(format!(
            "not a plain filename: {}",
            text.as_str()
        )));
    }
    Ok(text.into_string())
}

fn validate_tag(input: &str) -> RegistryResult<NonEmptyText> {
    NonEmptyText::new(input).map_err(|_| RegistryError::InvalidInput("tag cannot be empty".into()))
}
