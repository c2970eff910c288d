//! Application configuration and session state, stored as one TOML file.
//!
//! Besides user preferences, the file carries the session: both panel paths,
//! the cursor cache and the bookmarks. It is read once at start-up and
//! written back only at clean shutdown.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::nav::bookmarks::Bookmarks;
use crate::nav::cursor_cache::CursorCache;

/// Top-level configuration.
///
/// Every field has a default so duofm works without a config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Left panel directory at last clean shutdown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_path: Option<PathBuf>,
    /// Right panel directory at last clean shutdown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_path: Option<PathBuf>,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub shell: ShellConfig,
    /// Key name → action id overrides.
    #[serde(default)]
    pub keys: BTreeMap<String, String>,
    #[serde(default)]
    pub cursor_cache: CursorCache,
    #[serde(default)]
    pub bookmarks: Bookmarks,
}

/// Where a loaded [`Config`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// Parsed from the file.
    File,
    /// No file yet; defaults.
    Missing,
    /// The file exists but could not be read or parsed; defaults.
    Invalid,
}

impl ConfigOrigin {
    /// Whether saving over the file is safe. An unreadable file is left
    /// alone so a typo never costs the user their bookmarks.
    pub fn may_overwrite(self) -> bool {
        !matches!(self, Self::Invalid)
    }
}

impl Config {
    /// Loads configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if the file does not exist.
    /// - [`CoreError::PermissionDenied`] if the file is not readable.
    /// - [`CoreError::ConfigParse`] if the TOML is malformed.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => CoreError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => CoreError::PermissionDenied(path.to_path_buf()),
            _ => CoreError::Io(e),
        })?;
        toml::from_str(&content).map_err(|e| CoreError::ConfigParse(e.to_string()))
    }

    /// Like [`Config::load`], but never fails: a missing file yields the
    /// defaults, any other problem is logged and yields the defaults too.
    pub fn load_or_default(path: &Path) -> (Self, ConfigOrigin) {
        match Self::load(path) {
            Ok(config) => {
                tracing::debug!(path = %path.display(), "loaded config");
                (config, ConfigOrigin::File)
            }
            Err(CoreError::NotFound(_)) => {
                tracing::info!(path = %path.display(), "no config file, using defaults");
                (Self::default(), ConfigOrigin::Missing)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                (Self::default(), ConfigOrigin::Invalid)
            }
        }
    }

    /// Writes the configuration to `path`, replacing it atomically.
    ///
    /// Missing parent directories are created. The content goes to a
    /// temporary sibling first, which is then renamed over `path`.
    pub fn save(&self, path: &Path) -> CoreResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let text = toml::to_string_pretty(self)
            .map_err(|e| CoreError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))?;

        let tmp = temp_sibling(path);
        std::fs::write(&tmp, text)?;
        if let Err(e) = std::fs::rename(&tmp, path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }
        tracing::debug!(path = %path.display(), "saved config");
        Ok(())
    }

    /// The shell program override, if one is configured.
    pub fn shell_program(&self) -> Option<String> {
        crate::exec::shell_override(&self.shell.program)
    }
}

/// Display preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Show date and size columns when the panel is wide enough.
    #[serde(default = "default_true")]
    pub show_details: bool,
    /// chrono `strftime` format for modification times.
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_details: true,
            date_format: default_date_format(),
        }
    }
}

/// Interactive shell settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShellConfig {
    /// `"auto"` picks `%COMSPEC%`, `$SHELL` or `/bin/sh`.
    #[serde(default = "default_shell_program")]
    pub program: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            program: default_shell_program(),
        }
    }
}

/// `<platform config dir>/duofm/config.toml`, if the platform has one.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "duofm").map(|dirs| dirs.config_dir().join("config.toml"))
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "config.toml".to_string());
    path.with_file_name(format!(".{name}.tmp"))
}

fn default_true() -> bool {
    true
}

fn default_date_format() -> String {
    "%d %b %Y %H:%M:%S".to_string()
}

fn default_shell_program() -> String {
    "auto".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = Config::default();

        assert!(config.left_path.is_none());
        assert!(config.right_path.is_none());
        assert!(config.ui.show_details);
        assert_eq!(config.ui.date_format, "%d %b %Y %H:%M:%S");
        assert_eq!(config.shell.program, "auto");
        assert!(config.shell_program().is_none());
        assert!(config.keys.is_empty());
        assert!(config.bookmarks.is_empty());
        assert!(config.cursor_cache.is_empty());
    }

    #[test]
    fn load_full_toml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(
            &path,
            r#"
left_path = "/home/u/src"
right_path = "/home/u/docs"

[ui]
show_details = false
date_format = "%Y-%m-%d"

[shell]
program = "/bin/zsh"

[keys]
x = "delete"

[cursor_cache]
"/home/u" = "src"

[bookmarks]
1 = "/home/u/projects"
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();

        assert_eq!(config.left_path.as_deref(), Some(Path::new("/home/u/src")));
        assert_eq!(config.right_path.as_deref(), Some(Path::new("/home/u/docs")));
        assert!(!config.ui.show_details);
        assert_eq!(config.ui.date_format, "%Y-%m-%d");
        assert_eq!(config.shell_program().as_deref(), Some("/bin/zsh"));
        assert_eq!(config.keys.get("x").map(String::as_str), Some("delete"));
        assert_eq!(config.cursor_cache.recall(Path::new("/home/u")), "src");
        assert_eq!(config.bookmarks.get('1'), Some(Path::new("/home/u/projects")));
    }

    #[test]
    fn load_partial_toml_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[ui]\nshow_details = false\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert!(!config.ui.show_details);
        assert_eq!(config.ui.date_format, "%d %b %Y %H:%M:%S");
        assert!(config.left_path.is_none());
    }

    #[test]
    fn load_nonexistent_returns_not_found() {
        let tmp = TempDir::new().unwrap();
        let result = Config::load(&tmp.path().join("nonexistent.toml"));
        assert!(matches!(result.unwrap_err(), CoreError::NotFound(_)));
    }

    #[test]
    fn load_invalid_toml_returns_config_parse() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "this is not valid [[[toml").unwrap();

        let result = Config::load(&path);
        assert!(matches!(result.unwrap_err(), CoreError::ConfigParse(_)));
    }

    #[test]
    fn load_or_default_classifies_origin() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");

        let (_, origin) = Config::load_or_default(&path);
        assert_eq!(origin, ConfigOrigin::Missing);
        assert!(origin.may_overwrite());

        fs::write(&path, "left_path = [").unwrap();
        let (config, origin) = Config::load_or_default(&path);
        assert_eq!(origin, ConfigOrigin::Invalid);
        assert!(!origin.may_overwrite());
        assert!(config.left_path.is_none());

        fs::write(&path, "left_path = \"/x\"").unwrap();
        let (_, origin) = Config::load_or_default(&path);
        assert_eq!(origin, ConfigOrigin::File);
    }

    #[test]
    fn save_then_load_preserves_session() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("dir").join("config.toml");

        let mut config = Config {
            left_path: Some(PathBuf::from("/a")),
            right_path: Some(PathBuf::from("/b")),
            bookmarks: Bookmarks::new().with_bookmark('5', "/home/x"),
            ..Config::default()
        };
        config.cursor_cache.remember(Path::new("/a"), "file.txt");
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.left_path, config.left_path);
        assert_eq!(loaded.right_path, config.right_path);
        assert_eq!(loaded.bookmarks.get('5'), Some(Path::new("/home/x")));
        assert_eq!(loaded.cursor_cache.recall(Path::new("/a")), "file.txt");
    }

    #[test]
    fn save_replaces_existing_file_and_leaves_no_temp() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "left_path = \"/old\"").unwrap();

        let config = Config {
            left_path: Some(PathBuf::from("/new")),
            ..Config::default()
        };
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.left_path.as_deref(), Some(Path::new("/new")));
        let leftovers: Vec<_> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("config.toml")]);
    }

    #[test]
    fn default_config_path_ends_with_config_toml() {
        if let Some(path) = default_config_path() {
            assert!(path.ends_with("config.toml"));
        }
    }
}
