//! Key binding configuration.
//!
//! A [`Keymap`] maps [`Key`]s to the [`Action`]s the dispatcher runs from
//! Idle. The defaults are the classic duofm bindings (arrow keys plus a
//! vi-like letter alternative for each); the `[keys]` table of the config
//! file layers overrides on top, written as key name → action id:
//!
//! ```toml
//! [keys]
//! x = "delete"
//! F8 = "delete"
//! D = ""        # unbind
//! ```

use std::collections::{BTreeMap, HashMap};

use crate::action::Action;
use crate::event::Key;

/// Complete set of key bindings.
#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: HashMap<Key, Action>,
}

impl Default for Keymap {
    fn default() -> Self {
        use Action::*;

        let defaults = [
            (Key::Esc, Quit),
            (Key::Char('q'), Quit),
            (Key::Char('Q'), Quit),
            (Key::Tab, SwitchPanel),
            (Key::Up, CursorUp),
            (Key::Char('k'), CursorUp),
            (Key::Down, CursorDown),
            (Key::Char('j'), CursorDown),
            (Key::PageUp, PageUp),
            (Key::Char('u'), PageUp),
            (Key::PageDown, PageDown),
            (Key::Char('i'), PageDown),
            (Key::Home, CursorFirst),
            (Key::Char('y'), CursorFirst),
            (Key::End, CursorLast),
            (Key::Char('o'), CursorLast),
            (Key::Left, GoParent),
            (Key::Char('h'), GoParent),
            (Key::Backspace, GoParent),
            (Key::Right, EnterDir),
            (Key::Char('l'), EnterDir),
            (Key::Enter, EnterDir),
            (Key::Char(' '), ToggleSelect),
            (Key::Char('a'), SelectAll),
            (Key::F(5), Refresh),
            (Key::Char('r'), Refresh),
            (Key::Char(':'), Shell),
            (Key::Char('b'), BookmarkJump),
            (Key::Char('B'), BookmarkSet),
            (Key::Char('c'), Copy),
            (Key::Char('m'), Move),
            (Key::Char('D'), Delete),
        ];

        Self {
            bindings: defaults.into_iter().collect(),
        }
    }
}

impl Keymap {
    /// The default keymap with `overrides` (key name → action id) applied.
    ///
    /// An empty action id unbinds the key. Unknown key names and action ids
    /// are logged and skipped.
    pub fn with_overrides(overrides: &BTreeMap<String, String>) -> Self {
        let mut bindings = Self::default().bindings;
        for (name, action_id) in overrides {
            let Some(key) = Key::parse(name) else {
                tracing::warn!(key = %name, "unknown key name in [keys]");
                continue;
            };
            if action_id.is_empty() {
                bindings.remove(&key);
                continue;
            }
            match Action::from_id(action_id) {
                Some(action) => {
                    bindings.insert(key, action);
                }
                None => tracing::warn!(key = %name, action = %action_id, "unknown action in [keys]"),
            }
        }
        Self { bindings }
    }

    /// Returns the action mapped to `key`, or `None` if unbound.
    pub fn action_for_key(&self, key: Key) -> Option<Action> {
        self.bindings.get(&key).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::DESCRIPTORS;
    use std::collections::HashSet;

    fn overrides(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn default_keymap_has_navigation_keys() {
        let keymap = Keymap::default();

        assert_eq!(keymap.action_for_key(Key::Char('j')), Some(Action::CursorDown));
        assert_eq!(keymap.action_for_key(Key::Down), Some(Action::CursorDown));
        assert_eq!(keymap.action_for_key(Key::Char('k')), Some(Action::CursorUp));
        assert_eq!(keymap.action_for_key(Key::Char('u')), Some(Action::PageUp));
        assert_eq!(keymap.action_for_key(Key::Char('i')), Some(Action::PageDown));
        assert_eq!(keymap.action_for_key(Key::Char('y')), Some(Action::CursorFirst));
        assert_eq!(keymap.action_for_key(Key::Char('o')), Some(Action::CursorLast));
        assert_eq!(keymap.action_for_key(Key::Char('h')), Some(Action::GoParent));
        assert_eq!(keymap.action_for_key(Key::Right), Some(Action::EnterDir));
        assert_eq!(keymap.action_for_key(Key::Enter), Some(Action::EnterDir));
    }

    #[test]
    fn default_keymap_has_file_operation_keys() {
        let keymap = Keymap::default();

        assert_eq!(keymap.action_for_key(Key::Char('c')), Some(Action::Copy));
        assert_eq!(keymap.action_for_key(Key::Char('m')), Some(Action::Move));
        assert_eq!(keymap.action_for_key(Key::Char('D')), Some(Action::Delete));
        assert_eq!(keymap.action_for_key(Key::Char('d')), None);
    }

    #[test]
    fn default_keymap_has_misc_keys() {
        let keymap = Keymap::default();

        assert_eq!(keymap.action_for_key(Key::Esc), Some(Action::Quit));
        assert_eq!(keymap.action_for_key(Key::Char('Q')), Some(Action::Quit));
        assert_eq!(keymap.action_for_key(Key::Tab), Some(Action::SwitchPanel));
        assert_eq!(keymap.action_for_key(Key::Char(' ')), Some(Action::ToggleSelect));
        assert_eq!(keymap.action_for_key(Key::F(5)), Some(Action::Refresh));
        assert_eq!(keymap.action_for_key(Key::Char(':')), Some(Action::Shell));
        assert_eq!(keymap.action_for_key(Key::Char('b')), Some(Action::BookmarkJump));
        assert_eq!(keymap.action_for_key(Key::Char('B')), Some(Action::BookmarkSet));
    }

    #[test]
    fn every_action_has_a_default_key() {
        let keymap = Keymap::default();
        let bound: HashSet<Action> = keymap.bindings.values().copied().collect();
        for d in DESCRIPTORS {
            assert!(bound.contains(&d.action), "{} is unbound", d.id);
        }
    }

    #[test]
    fn overrides_rebind_and_keep_other_defaults() {
        let keymap = Keymap::with_overrides(&overrides(&[("x", "delete"), ("F8", "delete")]));

        assert_eq!(keymap.action_for_key(Key::Char('x')), Some(Action::Delete));
        assert_eq!(keymap.action_for_key(Key::F(8)), Some(Action::Delete));
        assert_eq!(keymap.action_for_key(Key::Char('D')), Some(Action::Delete));
        assert_eq!(keymap.action_for_key(Key::Char('j')), Some(Action::CursorDown));
    }

    #[test]
    fn empty_action_unbinds() {
        let keymap = Keymap::with_overrides(&overrides(&[("D", "")]));
        assert_eq!(keymap.action_for_key(Key::Char('D')), None);
    }

    #[test]
    fn unknown_names_and_actions_are_skipped() {
        let keymap = Keymap::with_overrides(&overrides(&[
            ("Hyper", "quit"),
            ("z", "open_pager"),
        ]));
        assert_eq!(keymap.action_for_key(Key::Char('z')), None);
        assert_eq!(keymap.bindings.len(), Keymap::default().bindings.len());
    }
}
