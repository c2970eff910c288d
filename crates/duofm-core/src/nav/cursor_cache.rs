//! Remembered cursor positions per directory.
//!
//! When the user leaves a directory, the name of the entry under the cursor
//! is stored under that directory's path; on return the panel places the
//! cursor on it again. Keys fold case on hosts whose filesystems are
//! case-insensitive by default.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Directory path → last cursor entry name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct CursorCache {
    entries: BTreeMap<String, String>,
    fold_case: bool,
}

impl Default for CursorCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CursorCache {
    /// Creates an empty cache using the host's case rule.
    #[must_use]
    pub fn new() -> Self {
        Self::with_case_folding(host_is_case_insensitive())
    }

    /// Creates an empty cache with an explicit case rule.
    #[must_use]
    pub fn with_case_folding(fold_case: bool) -> Self {
        Self {
            entries: BTreeMap::new(),
            fold_case,
        }
    }

    /// Remembers `name` as the cursor entry for `dir`.
    ///
    /// An empty name removes the entry instead.
    pub fn remember(&mut self, dir: &Path, name: &str) {
        let key = self.key(dir);
        if name.is_empty() {
            self.entries.remove(&key);
        } else {
            self.entries.insert(key, name.to_owned());
        }
    }

    /// The remembered cursor entry for `dir`, or `""`.
    #[must_use]
    pub fn recall(&self, dir: &Path) -> &str {
        self.entries
            .get(&self.key(dir))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn key(&self, dir: &Path) -> String {
        let key = dir.to_string_lossy();
        if self.fold_case {
            key.to_lowercase()
        } else {
            key.into_owned()
        }
    }
}

impl From<BTreeMap<String, String>> for CursorCache {
    fn from(map: BTreeMap<String, String>) -> Self {
        let mut cache = Self::new();
        for (dir, name) in map {
            cache.remember(Path::new(&dir), &name);
        }
        cache
    }
}

impl From<CursorCache> for BTreeMap<String, String> {
    fn from(cache: CursorCache) -> Self {
        cache.entries
    }
}

fn host_is_case_insensitive() -> bool {
    cfg!(any(windows, target_os = "macos"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recall_of_unknown_dir_is_empty() {
        let cache = CursorCache::with_case_folding(false);
        assert_eq!(cache.recall(Path::new("/nowhere")), "");
    }

    #[test]
    fn remember_then_recall() {
        let mut cache = CursorCache::with_case_folding(false);
        cache.remember(Path::new("/home/u"), "notes.txt");
        assert_eq!(cache.recall(Path::new("/home/u")), "notes.txt");
    }

    #[test]
    fn remember_overwrites() {
        let mut cache = CursorCache::with_case_folding(false);
        cache.remember(Path::new("/a"), "one");
        cache.remember(Path::new("/a"), "two");
        assert_eq!(cache.recall(Path::new("/a")), "two");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn remember_empty_name_forgets() {
        let mut cache = CursorCache::with_case_folding(false);
        cache.remember(Path::new("/a"), "one");
        cache.remember(Path::new("/a"), "");
        assert!(cache.is_empty());
    }

    #[test]
    fn case_sensitive_keys_are_distinct() {
        let mut cache = CursorCache::with_case_folding(false);
        cache.remember(Path::new("/Docs"), "upper");
        cache.remember(Path::new("/docs"), "lower");
        assert_eq!(cache.recall(Path::new("/Docs")), "upper");
        assert_eq!(cache.recall(Path::new("/docs")), "lower");
    }

    #[test]
    fn case_folding_keys_match_any_case() {
        let mut cache = CursorCache::with_case_folding(true);
        cache.remember(Path::new("C:\\Users\\Me"), "Desktop");
        assert_eq!(cache.recall(Path::new("c:\\users\\me")), "Desktop");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn toml_round_trip_as_plain_table() {
        #[derive(Serialize, Deserialize)]
        struct Holder {
            cursor_cache: CursorCache,
        }

        let mut cache = CursorCache::new();
        cache.remember(Path::new("/home/user"), "projects");
        let text = toml::to_string_pretty(&Holder {
            cursor_cache: cache.clone(),
        })
        .unwrap();
        assert!(text.contains("[cursor_cache]"));
        assert!(text.contains("projects"));

        let loaded: Holder = toml::from_str(&text).unwrap();
        assert_eq!(loaded.cursor_cache.recall(Path::new("/home/user")), "projects");
    }
}
