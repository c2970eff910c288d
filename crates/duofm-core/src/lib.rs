//! duofm core library: UI-agnostic logic for a two-pane file manager.
//!
//! `duofm-core` owns everything with real invariants: directory listings,
//! panel navigation and selection, the keystroke state machine, and the
//! guarded platform file operations. The terminal frontend (`duofm-tui`)
//! only translates keys and draws.
//!
//! # Modules
//!
//! - [`fs`]: [`FileEntry`] and directory reading.
//! - [`nav`]: [`Panel`], the [`CursorCache`] and [`Bookmarks`].
//! - [`exec`]: shell command execution, root guards and the [`Platform`] seam.
//! - [`dispatch`]: the [`Dispatcher`] state machine.
//! - [`config`]: TOML settings and session state ([`Config`]), key bindings ([`Keymap`]).
//! - [`action`], [`event`]: the [`Action`] set and the frontend-neutral [`Key`].
//! - [`error`]: unified error type ([`CoreError`]) and result alias ([`CoreResult`]).

pub mod action;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod exec;
pub mod fs;
pub mod nav;

pub use action::Action;
pub use config::keymap::Keymap;
pub use config::settings::{default_config_path, Config, ConfigOrigin};
pub use dispatch::{Dispatcher, Outcome, PendingCommand, Session, Side};
pub use error::{CoreError, CoreResult};
pub use event::Key;
pub use exec::{detect_platform, Platform, ProcessRunner};
pub use fs::entry::FileEntry;
pub use fs::ops::{read_directory, sort_entries};
pub use nav::bookmarks::Bookmarks;
pub use nav::cursor_cache::CursorCache;
pub use nav::panel::Panel;
