//! The keystroke state machine driving both panels.
//!
//! [`Dispatcher`] owns the two panels, the cursor cache, the bookmarks and
//! the host [`Platform`]. The frontend feeds it one [`Key`] at a time and
//! renders whatever state results; there are no other entry points that
//! mutate it.

use std::path::{Path, PathBuf};

use crate::action::Action;
use crate::config::keymap::Keymap;
use crate::error::CoreResult;
use crate::event::Key;
use crate::exec::guard;
use crate::exec::platform::Platform;
use crate::nav::bookmarks::Bookmarks;
use crate::nav::cursor_cache::CursorCache;
use crate::nav::panel::Panel;

/// A multi-keystroke command waiting for its next key.
///
/// Every state other than `Idle` consumes exactly one key and returns to
/// `Idle`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PendingCommand {
    #[default]
    Idle,
    /// After bookmark-jump: a drive letter, digit, `/` or `~`.
    AwaitBookmarkOrDriveKey,
    /// After bookmark-set: the digit to store the active path under.
    AwaitBookmarkSetDigit,
    /// After delete: only `key` again confirms deleting `sources`.
    AwaitDeleteConfirm { key: Key, sources: Vec<PathBuf> },
}

/// One of the two panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }

    fn flip(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// What the frontend should do after a key was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Quit,
    /// Suspend the interface and call [`Dispatcher::run_shell`].
    Shell,
}

/// Starting state for a [`Dispatcher`].
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub left: PathBuf,
    pub right: PathBuf,
    pub cursor_cache: CursorCache,
    pub bookmarks: Bookmarks,
}

/// Orchestrates both panels through the Idle / pending-command state
/// machine.
pub struct Dispatcher {
    panels: [Panel; 2],
    active: Side,
    cursor_cache: CursorCache,
    bookmarks: Bookmarks,
    keymap: Keymap,
    platform: Box<dyn Platform>,
    pending: PendingCommand,
    status: Option<String>,
    page_size: usize,
    home: Option<PathBuf>,
}

impl Dispatcher {
    /// Opens both panels, each with the cursor on its cached entry. Listing
    /// errors end up in the status line.
    pub fn new(session: Session, keymap: Keymap, platform: Box<dyn Platform>) -> Self {
        let Session {
            left,
            right,
            cursor_cache,
            bookmarks,
        } = session;

        let (left_panel, left_result) = Panel::open(&left, cursor_cache.recall(&left));
        let (right_panel, right_result) = Panel::open(&right, cursor_cache.recall(&right));

        let mut dispatcher = Self {
            panels: [left_panel, right_panel],
            active: Side::Left,
            cursor_cache,
            bookmarks,
            keymap,
            platform,
            pending: PendingCommand::Idle,
            status: None,
            page_size: 1,
            home: None,
        };
        let mut errors = Vec::new();
        collect_error(&mut errors, left_result);
        collect_error(&mut errors, right_result);
        dispatcher.set_errors(errors);
        dispatcher
    }

    /// Directory the `~` bookmark-jump token leads to.
    #[must_use]
    pub fn with_home(mut self, home: Option<PathBuf>) -> Self {
        self.home = home;
        self
    }

    // --- accessors ---

    pub fn panel(&self, side: Side) -> &Panel {
        &self.panels[side.index()]
    }

    pub fn active_side(&self) -> Side {
        self.active
    }

    pub fn active(&self) -> &Panel {
        self.panel(self.active)
    }

    pub fn other(&self) -> &Panel {
        self.panel(self.active.flip())
    }

    pub fn cursor_cache(&self) -> &CursorCache {
        &self.cursor_cache
    }

    pub fn bookmarks(&self) -> &Bookmarks {
        &self.bookmarks
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn pending(&self) -> &PendingCommand {
        &self.pending
    }

    /// The current status text, if any.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Returns the status text and clears it; the frontend calls this once
    /// per redraw.
    pub fn take_status(&mut self) -> Option<String> {
        self.status.take()
    }

    /// Snapshot for persisting at shutdown: both panel paths, the bookmarks,
    /// and the cursor cache with each panel's current cursor recorded.
    pub fn session(&self) -> Session {
        let mut cursor_cache = self.cursor_cache.clone();
        for panel in &self.panels {
            if let Some(entry) = panel.cursor_entry() {
                cursor_cache.remember(panel.path(), entry.name());
            }
        }
        Session {
            left: self.panels[0].path().to_path_buf(),
            right: self.panels[1].path().to_path_buf(),
            cursor_cache,
            bookmarks: self.bookmarks.clone(),
        }
    }

    /// Whether the host has drive letters (changes the bookmark-jump prompt).
    fn has_drives(&self) -> bool {
        !self.platform.list_drives().is_empty()
    }

    /// Clamps both panels to a viewport of `height` rows and uses that
    /// height as the page size for page-up/page-down.
    pub fn clamp_panels(&mut self, height: usize) {
        self.page_size = height.max(1);
        for panel in &mut self.panels {
            panel.clamp_pos(height);
        }
    }

    // --- key handling ---

    /// Handles one keystroke.
    ///
    /// `progress` receives a line before each item of a copy/move/delete
    /// batch so the frontend can paint it while the item runs.
    pub fn handle_key(&mut self, key: Key, progress: &mut dyn FnMut(&str)) -> Outcome {
        match std::mem::take(&mut self.pending) {
            PendingCommand::Idle => self.handle_idle(key, progress),
            PendingCommand::AwaitBookmarkOrDriveKey => {
                self.resolve_jump(key);
                Outcome::Continue
            }
            PendingCommand::AwaitBookmarkSetDigit => {
                if let Some(digit) = key.as_char().filter(|c| Bookmarks::is_slot(*c)) {
                    let path = self.active().path().to_path_buf();
                    tracing::debug!(slot = %digit, path = %path.display(), "bookmark set");
                    self.bookmarks = std::mem::take(&mut self.bookmarks).with_bookmark(digit, path);
                }
                Outcome::Continue
            }
            PendingCommand::AwaitDeleteConfirm {
                key: delete_key,
                sources,
            } => {
                if key == delete_key {
                    self.delete_batch(&sources, progress);
                } else {
                    tracing::debug!("delete cancelled");
                }
                Outcome::Continue
            }
        }
    }

    fn handle_idle(&mut self, key: Key, progress: &mut dyn FnMut(&str)) -> Outcome {
        let Some(action) = self.keymap.action_for_key(key) else {
            return Outcome::Continue;
        };
        let page = self.page_size;
        match action {
            Action::Quit => return Outcome::Quit,
            Action::SwitchPanel => self.active = self.active.flip(),
            Action::CursorUp => self.active_mut().cursor_up(1),
            Action::CursorDown => self.active_mut().cursor_down(1),
            Action::PageUp => self.active_mut().cursor_up(page),
            Action::PageDown => self.active_mut().cursor_down(page),
            Action::CursorFirst => self.active_mut().cursor_to_first(),
            Action::CursorLast => self.active_mut().cursor_to_last(),
            Action::GoParent => self.go_parent(),
            Action::EnterDir => self.enter_dir(),
            Action::ToggleSelect => self.active_mut().toggle_select_cursor(),
            Action::SelectAll => self.active_mut().toggle_select_all(),
            Action::Refresh => self.refresh_both(),
            Action::Shell => return Outcome::Shell,
            Action::BookmarkJump => {
                let prompt = if self.has_drives() {
                    "Press a drive letter or bookmark to cd to"
                } else {
                    "Press a bookmark to cd to"
                };
                self.pending = PendingCommand::AwaitBookmarkOrDriveKey;
                self.status = Some(prompt.to_string());
            }
            Action::BookmarkSet => {
                self.pending = PendingCommand::AwaitBookmarkSetDigit;
                self.status = Some("Press digit to bookmark to".to_string());
            }
            Action::Copy => self.copy_batch(progress),
            Action::Move => self.move_batch(progress),
            Action::Delete => {
                let sources = self.active().operation_sources();
                if !sources.is_empty() {
                    let listed: Vec<String> =
                        sources.iter().map(|s| s.display().to_string()).collect();
                    self.status = Some(format!(
                        "Press {key} again to confirm deleting {} files ({})",
                        sources.len(),
                        listed.join(" ")
                    ));
                    self.pending = PendingCommand::AwaitDeleteConfirm { key, sources };
                }
            }
        }
        Outcome::Continue
    }

    /// Runs the interactive shell in the active directory, then refreshes
    /// both panels. The caller suspends and restores the terminal around it.
    pub fn run_shell(&mut self) {
        let dir = self.active().path().to_path_buf();
        let shell_error = self.platform.spawn_interactive_shell(&dir).err();
        self.refresh_both();
        if let Some(e) = shell_error {
            tracing::warn!(error = %e, "shell");
            self.status = Some(e.to_string());
        }
    }

    // --- navigation ---

    fn go_parent(&mut self) {
        let path = self.active().path().to_path_buf();
        let parent = path.parent().map(Path::to_path_buf).unwrap_or_else(|| path.clone());
        if let Some(entry) = self.active().cursor_entry() {
            let name = entry.name().to_owned();
            self.cursor_cache.remember(&path, &name);
        }
        if let Some(own_name) = path.file_name() {
            self.cursor_cache
                .remember(&parent, &own_name.to_string_lossy());
        }
        self.navigate(parent);
    }

    fn enter_dir(&mut self) {
        let Some(entry) = self.active().cursor_entry().filter(|e| e.is_dir()) else {
            return;
        };
        let name = entry.name().to_owned();
        let path = self.active().path().to_path_buf();
        self.cursor_cache.remember(&path, &name);
        self.navigate(path.join(name));
    }

    fn resolve_jump(&mut self, key: Key) {
        let Some(c) = key.as_char() else {
            return;
        };
        let drive = c.to_ascii_uppercase();
        let target = if self.platform.list_drives().contains(&drive) {
            Some(PathBuf::from(format!("{drive}:\\")))
        } else if Bookmarks::is_slot(c) {
            self.bookmarks.get(c).map(Path::to_path_buf)
        } else if c == '/' {
            Some(guard::volume_root(self.active().path()))
        } else if c == '~' {
            self.home.clone()
        } else {
            None
        };
        if let Some(target) = target {
            self.navigate(target);
        }
    }

    /// Resets the active panel to `path` with the cached cursor.
    fn navigate(&mut self, path: PathBuf) {
        tracing::debug!(path = %path.display(), "navigate");
        let preferred = self.cursor_cache.recall(&path).to_owned();
        let result = self.active_mut().reset(path, &preferred);
        if let Err(e) = result {
            self.status = Some(e.to_string());
        }
    }

    fn refresh_both(&mut self) {
        let mut errors = Vec::new();
        for panel in &mut self.panels {
            collect_error(&mut errors, panel.refresh());
        }
        self.set_errors(errors);
    }

    // --- file operations ---

    fn copy_batch(&mut self, progress: &mut dyn FnMut(&str)) {
        if self.active().path() == self.other().path() {
            return;
        }
        let sources = self.active().operation_sources();
        let dst = self.other().path().to_path_buf();
        let mut errors = Vec::new();
        for (i, src) in sources.iter().enumerate() {
            progress(&format!(
                "Copying file {}/{}: {}",
                i + 1,
                sources.len(),
                src.display()
            ));
            collect_error(&mut errors, self.platform.copy(src, &dst));
        }

        let other = self.active.flip();
        collect_error(&mut errors, self.panels[other.index()].refresh());
        if self.active().path() == self.other().path() {
            collect_error(&mut errors, self.active_mut().refresh());
        }
        self.set_errors(errors);
    }

    fn move_batch(&mut self, progress: &mut dyn FnMut(&str)) {
        if self.active().path() == self.other().path() {
            return;
        }
        let sources = self.active().operation_sources();
        let dst = self.other().path().to_path_buf();
        let mut errors = Vec::new();
        for (i, src) in sources.iter().enumerate() {
            progress(&format!(
                "Moving file {}/{}: {}",
                i + 1,
                sources.len(),
                src.display()
            ));
            collect_error(&mut errors, self.platform.move_into(src, &dst));
        }

        for panel in &mut self.panels {
            collect_error(&mut errors, panel.refresh());
        }
        self.set_errors(errors);
    }

    fn delete_batch(&mut self, sources: &[PathBuf], progress: &mut dyn FnMut(&str)) {
        let mut errors = Vec::new();
        for (i, src) in sources.iter().enumerate() {
            progress(&format!(
                "Deleting file {}/{}: {}",
                i + 1,
                sources.len(),
                src.display()
            ));
            collect_error(&mut errors, self.platform.delete(src));
        }

        collect_error(&mut errors, self.active_mut().refresh());
        if self.active().path() == self.other().path() {
            let other = self.active.flip();
            collect_error(&mut errors, self.panels[other.index()].refresh());
        }
        self.set_errors(errors);
    }

    // --- helpers ---

    fn active_mut(&mut self) -> &mut Panel {
        &mut self.panels[self.active.index()]
    }

    fn set_errors(&mut self, errors: Vec<String>) {
        if !errors.is_empty() {
            self.status = Some(errors.join(" "));
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("left", &self.panels[0].path())
            .field("right", &self.panels[1].path())
            .field("active", &self.active)
            .field("pending", &self.pending)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

fn collect_error(errors: &mut Vec<String>, result: CoreResult<()>) {
    if let Err(e) = result {
        errors.push(e.to_string());
    }
}
