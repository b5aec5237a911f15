//! # Stickerbox Core
//!
//! Business logic for the Stickerbox file-sharing service.
//!
//! This crate reconciles the sticker storage directory on disk with the
//! persisted tag/pin metadata and exposes the product operations:
//! - Listing stickers merged with their tags and pin state
//! - Tag add/remove and pin toggling
//! - Uploads (overwrite-by-name) and password-gated deletion with metadata
//!   cleanup
//!
//! **No API concerns**: HTTP routing, JSON wire shapes and static serving
//! belong in `api-rest`.

mod config;
mod error;
mod registry;

pub use config::{load_or_create_config, ConfigFile, CoreConfig, DEFAULT_DELETE_PASSWORD};
pub use error::{RegistryError, RegistryResult};
pub use registry::{RegistryService, StoredFile};
