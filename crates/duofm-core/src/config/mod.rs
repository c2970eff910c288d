//! Configuration management.
//!
//! User preferences and session state ([`settings::Config`]) live in one TOML
//! file; key bindings ([`keymap::Keymap`]) are built from the defaults plus
//! its `[keys]` table.

pub mod keymap;
pub mod settings;
