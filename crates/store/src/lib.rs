//! Durable tag and pin metadata for Stickerbox.
//!
//! This crate owns the persisted mapping of sticker filename to tags plus the
//! set of pinned filenames. The store is deliberately simple:
//!
//! - The whole structure is small (bounded by the number of uploaded files),
//!   so every mutation is a complete load-mutate-save cycle rather than an
//!   incremental diff. A crash between operations always leaves a valid, if
//!   stale, file on disk.
//! - Reads never fail. A missing, unreadable or corrupt file degrades to the
//!   empty store so the service keeps working and the user re-tags at worst.
//! - Writes go through a temporary file and an atomic rename, so a torn write
//!   never replaces the previous good state.
//!
//! Persistence sits behind the [`TagRepository`] trait so a transactional
//! backend can replace the JSON file without touching the operation surface
//! in [`MetadataStore`].

mod json_repo;
mod metadata;
mod tag_store;

pub use json_repo::JsonTagRepository;
pub use metadata::MetadataStore;
pub use tag_store::TagStore;

/// Errors that can occur while persisting the tag store.
///
/// Load failures are absorbed inside the repository (they degrade to the
/// empty store); only save failures surface to callers.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The tag store could not be serialized to JSON
    #[error("failed to serialize tag store: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The tag store file could not be written or renamed into place
    #[error("failed to write tag store: {0}")]
    Io(#[from] std::io::Error),
}

/// Abstraction over tag store persistence.
///
/// `load` is infallible by contract: implementations must fall back to
/// [`TagStore::default`] on any read or parse error.
pub trait TagRepository: Send + Sync {
    /// Reads the persisted store, degrading to the empty default on failure.
    fn load(&self) -> TagStore;

    /// Serializes and replaces the persisted store.
    fn save(&self, store: &TagStore) -> Result<(), StoreError>;
}
