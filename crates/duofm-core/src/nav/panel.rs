//! One side of the dual view.
//!
//! A [`Panel`] is bound to a single directory and owns its listing, cursor,
//! viewport and selection. It is replaced wholesale on navigation
//! ([`Panel::reset`]) and re-listed in place, preserving the user's intent,
//! by [`Panel::refresh`].

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use crate::error::CoreResult;
use crate::fs::entry::FileEntry;
use crate::fs::ops::read_directory;

/// Navigation and selection state for one directory.
///
/// Invariants, enforced by [`Panel::clamp_pos`]:
///
/// - `cursor < entries.len()` unless the listing is empty (then `0`);
/// - `top <= cursor < top + viewport_height`;
/// - every selected index is `< entries.len()`.
///
/// Cursor movement methods may leave the cursor out of range; the caller
/// clamps before the next render.
#[derive(Debug, Clone, Default)]
pub struct Panel {
    path: PathBuf,
    entries: Vec<FileEntry>,
    top: usize,
    cursor: usize,
    selected: BTreeSet<usize>,
}

impl Panel {
    /// Creates a panel listing `path` with the cursor on `preferred_cursor`.
    ///
    /// The panel is returned even when listing fails; its entries are then
    /// empty and the error is handed back alongside it.
    pub fn open(path: impl Into<PathBuf>, preferred_cursor: &str) -> (Self, CoreResult<()>) {
        let mut panel = Self::default();
        let result = panel.reset(path, preferred_cursor);
        (panel, result)
    }

    /// Builds a panel from an already-ordered listing, for callers that do
    /// not read from disk.
    pub fn with_entries(path: impl Into<PathBuf>, entries: Vec<FileEntry>) -> Self {
        Self {
            path: path.into(),
            entries,
            ..Self::default()
        }
    }

    /// Re-binds the panel to `path` and lists it.
    ///
    /// Viewport and selection start over; the cursor lands on the entry named
    /// `preferred_cursor`, or index `0`. An unreadable directory leaves the
    /// panel bound to `path` with no entries and returns the list error.
    pub fn reset(&mut self, path: impl Into<PathBuf>, preferred_cursor: &str) -> CoreResult<()> {
        self.path = path.into();
        self.top = 0;
        self.cursor = 0;
        self.selected.clear();

        let outcome = match read_directory(&self.path) {
            Ok(entries) => {
                self.entries = entries;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "listing failed");
                self.entries.clear();
                Err(e)
            }
        };

        if let Some(index) = self.index_of(preferred_cursor) {
            self.cursor = index;
        }
        outcome
    }

    /// Re-lists the current directory, keeping the viewport, the cursor
    /// entry and the selection by *name*.
    ///
    /// If the entry under the cursor disappeared, the cursor stays at the
    /// same index, clamped to the new listing.
    pub fn refresh(&mut self) -> CoreResult<()> {
        if self.entries.is_empty() {
            let path = self.path.clone();
            return self.reset(path, "");
        }
        let top = self.top;
        let cursor_index = self.cursor.min(self.entries.len() - 1);
        let cursor_name = self.entries[cursor_index].name().to_owned();
        let selected_names: HashSet<String> = self
            .selected
            .iter()
            .filter_map(|&i| self.entries.get(i))
            .map(|e| e.name().to_owned())
            .collect();

        let path = self.path.clone();
        let result = self.reset(path, &cursor_name);
        if self.entries.is_empty() {
            return result;
        }

        self.top = top;
        if self.entries[self.cursor].name() != cursor_name {
            self.cursor = cursor_index.min(self.entries.len() - 1);
        }
        self.selected = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| selected_names.contains(e.name()))
            .map(|(i, _)| i)
            .collect();
        result
    }

    /// Enforces the panel invariants for a viewport of `height` rows.
    ///
    /// Idempotent. A zero height is treated as one row.
    pub fn clamp_pos(&mut self, height: usize) {
        let height = height.max(1);
        if self.entries.is_empty() {
            self.cursor = 0;
            self.top = 0;
            self.selected.clear();
            return;
        }
        let last = self.entries.len() - 1;
        self.cursor = self.cursor.min(last);
        if self.cursor < self.top {
            self.top = self.cursor;
        } else if self.cursor >= self.top + height {
            self.top = self.cursor + 1 - height;
        }
        self.top = self.top.min(last);
        self.selected.retain(|&i| i <= last);
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn top(&self) -> usize {
        self.top
    }

    pub fn selected(&self) -> &BTreeSet<usize> {
        &self.selected
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    /// Returns the entry under the cursor, if the cursor is in range.
    pub fn cursor_entry(&self) -> Option<&FileEntry> {
        self.entries.get(self.cursor)
    }

    /// Moves the cursor up by `n`, stopping at `0`.
    pub fn cursor_up(&mut self, n: usize) {
        self.cursor = self.cursor.saturating_sub(n);
    }

    /// Moves the cursor down by `n`. May overshoot; see [`Panel::clamp_pos`].
    pub fn cursor_down(&mut self, n: usize) {
        self.cursor = self.cursor.saturating_add(n);
    }

    pub fn cursor_to_first(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_to_last(&mut self) {
        if !self.entries.is_empty() {
            self.cursor = self.entries.len() - 1;
        }
    }

    /// Flips the selection state of the entry under the cursor.
    pub fn toggle_select_cursor(&mut self) {
        if self.cursor >= self.entries.len() {
            return;
        }
        if !self.selected.remove(&self.cursor) {
            self.selected.insert(self.cursor);
        }
    }

    /// Clears the selection if everything is selected, otherwise selects all.
    pub fn toggle_select_all(&mut self) {
        if self.selected.len() == self.entries.len() {
            self.selected.clear();
        } else {
            self.selected = (0..self.entries.len()).collect();
        }
    }

    /// Full paths of the operation's source items: the selection in listing
    /// order, or the sole cursor entry when nothing is selected.
    pub fn operation_sources(&self) -> Vec<PathBuf> {
        if self.selected.is_empty() {
            return self
                .cursor_entry()
                .map(|e| vec![self.path.join(e.name())])
                .unwrap_or_default();
        }
        self.selected
            .iter()
            .filter_map(|&i| self.entries.get(i))
            .map(|e| self.path.join(e.name()))
            .collect()
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        if name.is_empty() {
            return None;
        }
        self.entries.iter().position(|e| e.name() == name)
    }
}
