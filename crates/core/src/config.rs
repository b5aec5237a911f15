//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into the
//! registry service, so no environment variables or config files are read
//! during request handling.

use crate::{RegistryError, RegistryResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Delete password written to a freshly created config file.
pub const DEFAULT_DELETE_PASSWORD: &str = "admin123";

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    stickers_dir: PathBuf,
    public_dir: PathBuf,
    tags_file: PathBuf,
    delete_password: String,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    pub fn new(
        stickers_dir: PathBuf,
        public_dir: PathBuf,
        tags_file: PathBuf,
        delete_password: String,
    ) -> RegistryResult<Self> {
        if delete_password.trim().is_empty() {
            return Err(RegistryError::InvalidInput(
                "delete_password cannot be empty".into(),
            ));
        }
        if !stickers_dir.is_dir() {
            return Err(RegistryError::InvalidInput(format!(
                "stickers directory does not exist: {}",
                stickers_dir.display()
            )));
        }

        Ok(Self {
            stickers_dir,
            public_dir,
            tags_file,
            delete_password,
        })
    }

    /// Directory holding the uploaded sticker files.
    pub fn stickers_dir(&self) -> &Path {
        &self.stickers_dir
    }

    /// Root directory for the single-page client's static assets.
    pub fn public_dir(&self) -> &Path {
        &self.public_dir
    }

    /// Path of the persisted tag store.
    pub fn tags_file(&self) -> &Path {
        &self.tags_file
    }

    /// The shared password required for deletion.
    pub fn delete_password(&self) -> &str {
        &self.delete_password
    }
}

/// On-disk configuration file contents.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ConfigFile {
    /// Shared password required by the delete endpoint
    pub delete_password: String,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            delete_password: DEFAULT_DELETE_PASSWORD.into(),
        }
    }
}

/// Reads the config file at `path`, creating it with defaults on first run.
pub fn load_or_create_config(path: &Path) -> RegistryResult<ConfigFile> {
    if !path.exists() {
        let config = ConfigFile::default();
        let text = toml::to_string_pretty(&config)
            .map_err(|e| RegistryError::InvalidInput(format!("cannot serialize config: {e}")))?;
        fs::write(path, text)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(config);
    }

    let text = fs::read_to_string(path)?;
    toml::from_str(&text).map_err(|e| {
        RegistryError::InvalidInput(format!("invalid config file {}: {e}", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn rejects_empty_password() {
        let dir = TempDir::new().unwrap();
        let result = CoreConfig::new(
            dir.path().to_path_buf(),
            dir.path().join("public"),
            dir.path().join("tags.json"),
            "  ".into(),
        );
        assert!(matches!(result, Err(RegistryError::InvalidInput(_))));
    }

    #[test]
    fn rejects_missing_stickers_dir() {
        let dir = TempDir::new().unwrap();
        let result = CoreConfig::new(
            dir.path().join("nope"),
            dir.path().join("public"),
            dir.path().join("tags.json"),
            "secret".into(),
        );
        assert!(matches!(result, Err(RegistryError::InvalidInput(_))));
    }

    #[test]
    fn first_run_creates_default_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let config = load_or_create_config(&path).unwrap();
        assert_eq!(config.delete_password, DEFAULT_DELETE_PASSWORD);
        assert!(path.exists());

        // Second load reads the file that was just written.
        let again = load_or_create_config(&path).unwrap();
        assert_eq!(again.delete_password, DEFAULT_DELETE_PASSWORD);
    }

    #[test]
    fn existing_config_is_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "delete_password = \"hunter2\"\n").unwrap();

        let config = load_or_create_config(&path).unwrap();
        assert_eq!(config.delete_password, "hunter2");
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "delete_password = ").unwrap();

        assert!(load_or_create_config(&path).is_err());
    }
}
