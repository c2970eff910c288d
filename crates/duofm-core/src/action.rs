//! Idle-state commands.
//!
//! Every command the dispatcher accepts from the Idle state is an [`Action`].
//! Each has a stable snake-case identifier used by the `[keys]` config table.

/// A command triggered by a single keystroke from Idle.
///
/// Variants carry no parameters; the dispatcher reads context (active panel,
/// cursor, selection) when it runs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    SwitchPanel,
    CursorUp,
    CursorDown,
    PageUp,
    PageDown,
    CursorFirst,
    CursorLast,
    GoParent,
    EnterDir,
    ToggleSelect,
    SelectAll,
    Refresh,
    Shell,
    BookmarkJump,
    BookmarkSet,
    Copy,
    Move,
    Delete,
}

/// Config identifier of a single action.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ActionDescriptor {
    pub(crate) action: Action,
    /// Snake-case identifier used in the config file (e.g. `"cursor_up"`).
    pub(crate) id: &'static str,
}

pub(crate) const DESCRIPTORS: &[ActionDescriptor] = &[
    ActionDescriptor {
        action: Action::Quit,
        id: "quit",
    },
    ActionDescriptor {
        action: Action::SwitchPanel,
        id: "switch_panel",
    },
    ActionDescriptor {
        action: Action::CursorUp,
        id: "cursor_up",
    },
    ActionDescriptor {
        action: Action::CursorDown,
        id: "cursor_down",
    },
    ActionDescriptor {
        action: Action::PageUp,
        id: "page_up",
    },
    ActionDescriptor {
        action: Action::PageDown,
        id: "page_down",
    },
    ActionDescriptor {
        action: Action::CursorFirst,
        id: "go_first",
    },
    ActionDescriptor {
        action: Action::CursorLast,
        id: "go_last",
    },
    ActionDescriptor {
        action: Action::GoParent,
        id: "go_parent",
    },
    ActionDescriptor {
        action: Action::EnterDir,
        id: "enter_dir",
    },
    ActionDescriptor {
        action: Action::ToggleSelect,
        id: "toggle_select",
    },
    ActionDescriptor {
        action: Action::SelectAll,
        id: "select_all",
    },
    ActionDescriptor {
        action: Action::Refresh,
        id: "refresh",
    },
    ActionDescriptor {
        action: Action::Shell,
        id: "shell",
    },
    ActionDescriptor {
        action: Action::BookmarkJump,
        id: "bookmark_jump",
    },
    ActionDescriptor {
        action: Action::BookmarkSet,
        id: "bookmark_set",
    },
    ActionDescriptor {
        action: Action::Copy,
        id: "copy",
    },
    ActionDescriptor {
        action: Action::Move,
        id: "move",
    },
    ActionDescriptor {
        action: Action::Delete,
        id: "delete",
    },
];

impl Action {
    /// Looks up an action by its config identifier.
    pub fn from_id(id: &str) -> Option<Self> {
        DESCRIPTORS.iter().find(|d| d.id == id).map(|d| d.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<_> = DESCRIPTORS.iter().map(|d| d.id).collect();
        assert_eq!(ids.len(), DESCRIPTORS.len());
    }

    #[test]
    fn every_action_round_trips_through_its_id() {
        for d in DESCRIPTORS {
            assert_eq!(Action::from_id(d.id), Some(d.action));
        }
    }

    #[test]
    fn unknown_id_is_none() {
        assert_eq!(Action::from_id("open_pager"), None);
    }

    #[test]
    fn ids_are_snake_case() {
        for d in DESCRIPTORS {
            assert!(d
                .id
                .chars()
                .all(|c| c.is_ascii_lowercase() || c == '_'));
        }
    }

    #[test]
    fn each_action_appears_once() {
        let actions: HashSet<_> = DESCRIPTORS.iter().map(|d| d.action).collect();
        assert_eq!(actions.len(), DESCRIPTORS.len());
    }
}
