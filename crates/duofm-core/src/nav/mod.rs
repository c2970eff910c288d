//! Navigation state.
//!
//! [`panel::Panel`] holds one side of the view; [`cursor_cache::CursorCache`]
//! and [`bookmarks::Bookmarks`] are the two persistent maps that survive
//! between sessions.

pub mod bookmarks;
pub mod cursor_cache;
pub mod panel;
