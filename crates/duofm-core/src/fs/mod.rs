//! File system abstractions.
//!
//! [`entry::FileEntry`] is an immutable snapshot of one directory child;
//! [`ops::read_directory`] produces them in listing order.

pub mod entry;
pub mod ops;
