//! JSON file persistence for the tag store.

use crate::{StoreError, TagRepository, TagStore};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Tag store persistence backed by a single JSON file.
///
/// The file is pretty-printed UTF-8 with non-ASCII tag text written verbatim
/// (no `\u` escaping), so it stays readable for manual recovery. Saves write
/// to a sibling temporary file first and rename it into place, which is
/// atomic on the same filesystem.
#[derive(Debug)]
pub struct JsonTagRepository {
    path: PathBuf,
}

impl JsonTagRepository {
    /// Creates a repository persisting to `path`.
    ///
    /// The file does not need to exist yet; `load` treats a missing file as
    /// the empty store and the first `save` creates it.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the persisted file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "tags.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Interprets raw JSON, upgrading the legacy bare-mapping layout.
    ///
    /// Early versions persisted a plain `{filename: [tags]}` object with no
    /// `pinned` key. Such a value is detected by the absence of a top-level
    /// `files` key and wrapped as `{files: <mapping>, pinned: []}`.
    fn parse(bytes: &[u8]) -> Option<TagStore> {
        let value: serde_json::Value = serde_json::from_slice(bytes).ok()?;
        if !value.is_object() {
            return None;
        }

        if value.get("files").is_some() {
            serde_json::from_value(value).ok()
        } else {
            let files: BTreeMap<String, Vec<String>> = serde_json::from_value(value).ok()?;
            Some(TagStore {
                files,
                pinned: Vec::new(),
            })
        }
    }
}

impl TagRepository for JsonTagRepository {
    fn load(&self) -> TagStore {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return TagStore::default(),
            Err(e) => {
                tracing::warn!(
                    "could not read tag store {}: {e}; using empty store",
                    self.path.display()
                );
                return TagStore::default();
            }
        };

        match Self::parse(&bytes) {
            Some(store) => store,
            None => {
                tracing::warn!(
                    "tag store {} is corrupt; using empty store",
                    self.path.display()
                );
                TagStore::default()
            }
        }
    }

    fn save(&self, store: &TagStore) -> Result<(), StoreError> {
        // serde_json writes UTF-8 without escaping non-ASCII characters.
        let mut bytes = serde_json::to_vec_pretty(store)?;
        bytes.push(b'\n');

        let temp = self.temp_path();
        fs::write(&temp, &bytes)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn repo_in(dir: &TempDir) -> JsonTagRepository {
        JsonTagRepository::new(dir.path().join("tags.json"))
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir);
        assert_eq!(repo.load(), TagStore::default());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir);
        fs::write(repo.path(), b"{not json").unwrap();
        assert_eq!(repo.load(), TagStore::default());
    }

    #[test]
    fn non_object_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir);
        fs::write(repo.path(), b"[1, 2, 3]").unwrap();
        assert_eq!(repo.load(), TagStore::default());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir);

        let mut store = TagStore::default();
        store
            .files
            .insert("cat.png".into(), vec!["cat".into(), "表情".into()]);
        store.pinned.push("cat.png".into());

        repo.save(&store).unwrap();
        assert_eq!(repo.load(), store);
    }

    #[test]
    fn resave_of_loaded_store_is_stable() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir);

        let mut store = TagStore::default();
        store.files.insert("a.png".into(), vec!["one".into()]);
        store.pinned.push("a.png".into());
        repo.save(&store).unwrap();

        let first = fs::read(repo.path()).unwrap();
        let loaded = repo.load();
        repo.save(&loaded).unwrap();
        let second = fs::read(repo.path()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn non_ascii_tags_are_written_verbatim() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir);

        let mut store = TagStore::default();
        store.files.insert("meme.png".into(), vec!["搞笑".into()]);
        repo.save(&store).unwrap();

        let text = fs::read_to_string(repo.path()).unwrap();
        assert!(text.contains("搞笑"));
        assert!(!text.contains("\\u"));
    }

    #[test]
    fn legacy_bare_mapping_is_upgraded() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir);
        fs::write(
            repo.path(),
            br#"{"cat.png": ["cat", "cute"], "dog.png": []}"#,
        )
        .unwrap();

        let store = repo.load();
        assert_eq!(store.tags("cat.png"), ["cat", "cute"]);
        assert_eq!(store.tags("dog.png"), Vec::<String>::new());
        assert!(store.pinned.is_empty());
    }

    #[test]
    fn save_leaves_no_temp_file_behind() {
        let dir = TempDir::new().unwrap();
        let repo = repo_in(&dir);
        repo.save(&TagStore::default()).unwrap();

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, ["tags.json"]);
    }
}
