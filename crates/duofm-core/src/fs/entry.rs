//! File entry representation.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use unicode_normalization::UnicodeNormalization;

/// A single file or directory entry.
///
/// `FileEntry` is an immutable snapshot taken when the directory was listed;
/// it is never updated afterwards. Directory sizes are reported as `0`.
///
/// # Examples
///
/// ```no_run
/// use duofm_core::FileEntry;
/// use std::fs;
///
/// let metadata = fs::metadata("Cargo.toml").unwrap();
/// let entry = FileEntry::new("Cargo.toml".into(), &metadata);
/// assert_eq!(entry.name(), "Cargo.toml");
/// assert!(!entry.is_dir());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    path: PathBuf,
    name: String,
    size: u64,
    modified: Option<SystemTime>,
    is_dir: bool,
    mode: u32,
}

impl FileEntry {
    /// Creates a new `FileEntry` from a path and its metadata.
    pub fn new(path: PathBuf, metadata: &std::fs::Metadata) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().nfc().collect::<String>())
            .unwrap_or_default();

        Self {
            path,
            name,
            size: if metadata.is_dir() { 0 } else { metadata.len() },
            modified: metadata.modified().ok(),
            is_dir: metadata.is_dir(),
            mode: mode_bits(metadata),
        }
    }

    /// Creates a `FileEntry` from already-known attributes, without touching
    /// the filesystem.
    pub fn from_parts(
        path: PathBuf,
        size: u64,
        modified: Option<SystemTime>,
        is_dir: bool,
        mode: u32,
    ) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().nfc().collect::<String>())
            .unwrap_or_default();
        Self {
            path,
            name,
            size: if is_dir { 0 } else { size },
            modified,
            is_dir,
            mode,
        }
    }

    /// Returns the full path of this entry.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the file or directory name (last component of the path).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the file size in bytes. Always `0` for directories.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Returns the last-modified time, if available.
    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    /// Returns `true` if this entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// Returns the ten-character `drwxr-xr-x` style permission summary.
    pub fn permissions(&self) -> String {
        let mut out = String::with_capacity(10);
        out.push(if self.is_dir { 'd' } else { '-' });
        for shift in (0..9).rev() {
            let set = self.mode & (1 << shift) != 0;
            let c = match (set, shift % 3) {
                (false, _) => '-',
                (true, 2) => 'r',
                (true, 1) => 'w',
                (true, _) => 'x',
            };
            out.push(c);
        }
        out
    }
}

#[cfg(unix)]
fn mode_bits(metadata: &std::fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o777
}

#[cfg(not(unix))]
fn mode_bits(metadata: &std::fs::Metadata) -> u32 {
    let base = if metadata.is_dir() { 0o777 } else { 0o666 };
    if metadata.permissions().readonly() {
        base & 0o555
    } else {
        base
    }
}
