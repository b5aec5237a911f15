//! The tag/pin operation surface over a [`TagRepository`].

use crate::{JsonTagRepository, StoreError, TagRepository, TagStore};
use std::path::PathBuf;
use std::sync::Mutex;

/// Tag and pin bookkeeping with save-on-every-mutation semantics.
///
/// Every operation is a self-contained load-mutate-save cycle; no store state
/// is cached between calls. A process-wide mutex serializes the cycles so
/// concurrent writers cannot interleave their load/save pairs and lose an
/// update (whole-file last-save-wins is the failure mode being prevented).
pub struct MetadataStore {
    repo: Box<dyn TagRepository>,
    cycle: Mutex<()>,
}

impl MetadataStore {
    /// Creates a store over an arbitrary persistence backend.
    pub fn new(repo: Box<dyn TagRepository>) -> Self {
        Self {
            repo,
            cycle: Mutex::new(()),
        }
    }

    /// Convenience constructor for the default JSON file backend.
    pub fn with_json_file(path: impl Into<PathBuf>) -> Self {
        Self::new(Box::new(JsonTagRepository::new(path)))
    }

    fn locked<T>(&self, op: impl FnOnce(&dyn TagRepository) -> T) -> T {
        // A poisoned lock only means another thread panicked mid-cycle; the
        // on-disk store is still the last complete save, so continue.
        let _guard = self.cycle.lock().unwrap_or_else(|e| e.into_inner());
        op(self.repo.as_ref())
    }

    /// Returns a consistent copy of the whole store.
    pub fn snapshot(&self) -> TagStore {
        self.locked(|repo| repo.load())
    }

    /// Returns the tags for `filename`, empty if unknown.
    pub fn tags(&self, filename: &str) -> Vec<String> {
        self.locked(|repo| repo.load().tags(filename).to_vec())
    }

    /// Replaces the tag list for `filename` wholesale.
    pub fn set_tags(&self, filename: &str, tags: Vec<String>) -> Result<(), StoreError> {
        self.locked(|repo| {
            let mut store = repo.load();
            store.files.insert(filename.to_owned(), tags);
            repo.save(&store)
        })
    }

    /// Appends `tag` to `filename`. No-op if the tag is already present.
    pub fn add_tag(&self, filename: &str, tag: &str) -> Result<(), StoreError> {
        self.locked(|repo| {
            let mut store = repo.load();
            let tags = store.files.entry(filename.to_owned()).or_default();
            if tags.iter().any(|t| t == tag) {
                return Ok(());
            }
            tags.push(tag.to_owned());
            repo.save(&store)
        })
    }

    /// Removes `tag` from `filename`. No-op if the tag is absent.
    pub fn remove_tag(&self, filename: &str, tag: &str) -> Result<(), StoreError> {
        self.locked(|repo| {
            let mut store = repo.load();
            let Some(tags) = store.files.get_mut(filename) else {
                return Ok(());
            };
            let before = tags.len();
            tags.retain(|t| t != tag);
            if tags.len() == before {
                return Ok(());
            }
            repo.save(&store)
        })
    }

    /// Returns whether `filename` is pinned.
    pub fn is_pinned(&self, filename: &str) -> bool {
        self.locked(|repo| repo.load().is_pinned(filename))
    }

    /// Pins `filename`. No-op if already pinned.
    pub fn pin(&self, filename: &str) -> Result<(), StoreError> {
        self.locked(|repo| {
            let mut store = repo.load();
            if store.is_pinned(filename) {
                return Ok(());
            }
            store.pinned.push(filename.to_owned());
            repo.save(&store)
        })
    }

    /// Unpins `filename`. No-op if not pinned.
    pub fn unpin(&self, filename: &str) -> Result<(), StoreError> {
        self.locked(|repo| {
            let mut store = repo.load();
            let before = store.pinned.len();
            store.pinned.retain(|name| name != filename);
            if store.pinned.len() == before {
                return Ok(());
            }
            repo.save(&store)
        })
    }

    /// Flips the pinned state of `filename`, returning the new state.
    pub fn toggle_pin(&self, filename: &str) -> Result<bool, StoreError> {
        self.locked(|repo| {
            let mut store = repo.load();
            let now_pinned = if store.is_pinned(filename) {
                store.pinned.retain(|name| name != filename);
                false
            } else {
                store.pinned.push(filename.to_owned());
                true
            };
            repo.save(&store)?;
            Ok(now_pinned)
        })
    }

    /// Drops `filename` from both the tag map and the pinned set in a single
    /// save. Called after the underlying file is deleted.
    pub fn forget(&self, filename: &str) -> Result<(), StoreError> {
        self.locked(|repo| {
            let mut store = repo.load();
            let had_tags = store.files.remove(filename).is_some();
            let before = store.pinned.len();
            store.pinned.retain(|name| name != filename);
            if !had_tags && store.pinned.len() == before {
                return Ok(());
            }
            repo.save(&store)
        })
    }
}

impl std::fmt::Debug for MetadataStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> MetadataStore {
        MetadataStore::with_json_file(dir.path().join("tags.json"))
    }

    #[test]
    fn add_tag_appends_in_order() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.add_tag("cat.png", "cat").unwrap();
        store.add_tag("cat.png", "cute").unwrap();

        assert_eq!(store.tags("cat.png"), ["cat", "cute"]);
    }

    #[test]
    fn add_tag_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.add_tag("cat.png", "cat").unwrap();
        store.add_tag("cat.png", "cat").unwrap();

        assert_eq!(store.tags("cat.png"), ["cat"]);
    }

    #[test]
    fn remove_tag_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.add_tag("cat.png", "cat").unwrap();
        store.remove_tag("cat.png", "cat").unwrap();
        store.remove_tag("cat.png", "cat").unwrap();
        store.remove_tag("never-seen.png", "cat").unwrap();

        assert!(store.tags("cat.png").is_empty());
    }

    #[test]
    fn set_tags_replaces_wholesale() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.add_tag("cat.png", "old").unwrap();
        store
            .set_tags("cat.png", vec!["new".into(), "tags".into()])
            .unwrap();

        assert_eq!(store.tags("cat.png"), ["new", "tags"]);
    }

    #[test]
    fn pin_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.pin("cat.png").unwrap();
        store.pin("cat.png").unwrap();

        assert!(store.is_pinned("cat.png"));
        assert_eq!(store.snapshot().pinned, ["cat.png"]);
    }

    #[test]
    fn toggle_pin_flips_state() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert!(store.toggle_pin("cat.png").unwrap());
        assert!(store.is_pinned("cat.png"));
        assert!(!store.toggle_pin("cat.png").unwrap());
        assert!(!store.is_pinned("cat.png"));
    }

    #[test]
    fn forget_drops_tags_and_pin_state() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.add_tag("cat.png", "cat").unwrap();
        store.pin("cat.png").unwrap();
        store.forget("cat.png").unwrap();

        assert!(store.tags("cat.png").is_empty());
        assert!(!store.is_pinned("cat.png"));
    }

    #[test]
    fn mutations_persist_across_instances() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tags.json");

        let first = MetadataStore::with_json_file(&path);
        first.add_tag("cat.png", "cat").unwrap();
        first.pin("cat.png").unwrap();

        let second = MetadataStore::with_json_file(&path);
        assert_eq!(second.tags("cat.png"), ["cat"]);
        assert!(second.is_pinned("cat.png"));
    }

    #[test]
    fn concurrent_add_tags_lose_no_updates() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(store_in(&dir));

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.add_tag("cat.png", &format!("tag-{i}")).unwrap())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut tags = store.tags("cat.png");
        tags.sort();
        let expected: Vec<String> = {
            let mut v: Vec<String> = (0..16).map(|i| format!("tag-{i}")).collect();
            v.sort();
            v
        };
        assert_eq!(tags, expected);
    }
}
