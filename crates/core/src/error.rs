//! Registry error types.
//!
//! Every failure mode the HTTP boundary needs to distinguish is its own
//! variant, so handlers map errors to status codes by type rather than by
//! matching message text.

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The referenced file does not exist in the storage directory
    #[error("file not found: {0}")]
    NotFound(String),

    /// A required field was missing, empty, or not a plain filename
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The supplied delete password did not match the configured one
    #[error("wrong delete password")]
    Unauthorized,

    /// The tag store could not be persisted
    #[error("failed to persist tag store: {0}")]
    Persistence(#[from] stickerbox_store::StoreError),

    /// A filesystem read or write failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
