//! Digit-keyed directory bookmarks.
//!
//! Bookmarks map a single decimal digit (`'0'..='9'`) to an absolute
//! directory path. They are loaded with the configuration at start-up and
//! written back with it at clean shutdown.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A collection of digit bookmarks (digit → path).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Bookmarks {
    entries: BTreeMap<String, PathBuf>,
}

impl Bookmarks {
    /// Create an empty bookmark set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Returns `true` if `key` names a bookmark slot.
    #[must_use]
    pub fn is_slot(key: char) -> bool {
        key.is_ascii_digit()
    }

    /// Return a new `Bookmarks` with `path` stored under `slot`.
    ///
    /// Keys that are not digits leave the set unchanged.
    #[must_use]
    pub fn with_bookmark(self, slot: char, path: impl Into<PathBuf>) -> Self {
        if !Self::is_slot(slot) {
            return self;
        }
        let mut entries = self.entries;
        entries.insert(slot.to_string(), path.into());
        Self { entries }
    }

    /// Look up the path stored under `slot`.
    #[must_use]
    pub fn get(&self, slot: char) -> Option<&Path> {
        if !Self::is_slot(slot) {
            return None;
        }
        self.entries.get(slot.to_string().as_str()).map(PathBuf::as_path)
    }

    /// Number of bookmarks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
