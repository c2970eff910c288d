//! Directory reading and ordering.

use std::cmp::Ordering;
use std::path::Path;

use crate::error::{CoreError, CoreResult};
use crate::fs::entry::FileEntry;

/// Reads the immediate contents of a directory and returns them as
/// [`FileEntry`] values in listing order (see [`sort_entries`]).
///
/// Entries whose metadata cannot be read are skipped. Symbolic links are
/// resolved so a link to a directory lists as a directory; dangling links
/// list as plain files.
///
/// # Errors
///
/// - [`CoreError::NotFound`]: the path does not exist.
/// - [`CoreError::NotADirectory`]: the path is not a directory.
/// - [`CoreError::PermissionDenied`]: read access is denied.
/// - [`CoreError::Io`]: any other I/O error.
///
/// # Examples
///
/// ```no_run
/// use duofm_core::read_directory;
/// use std::path::Path;
///
/// let entries = read_directory(Path::new("/home/user")).unwrap();
/// for entry in &entries {
///     println!("{}", entry.name());
/// }
/// ```
pub fn read_directory(path: &Path) -> CoreResult<Vec<FileEntry>> {
    if !path.exists() {
        return Err(CoreError::NotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(CoreError::NotADirectory(path.to_path_buf()));
    }

    let read_dir = std::fs::read_dir(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::PermissionDenied {
            CoreError::PermissionDenied(path.to_path_buf())
        } else {
            CoreError::Io(e)
        }
    })?;

    let mut entries = Vec::new();
    for dir_entry in read_dir {
        let dir_entry = match dir_entry {
            Ok(e) => e,
            Err(_) => continue,
        };
        let entry_path = dir_entry.path();
        let metadata = match std::fs::metadata(&entry_path).or_else(|_| dir_entry.metadata()) {
            Ok(m) => m,
            Err(_) => continue,
        };
        entries.push(FileEntry::new(entry_path, &metadata));
    }

    sort_entries(&mut entries);
    tracing::debug!(path = %path.display(), count = entries.len(), "listed directory");
    Ok(entries)
}

/// Orders entries in place: directories first, then case-insensitive name
/// ascending. Names that fold to the same lowercase string fall back to a
/// byte-wise comparison so the order is total.
pub fn sort_entries(entries: &mut [FileEntry]) {
    entries.sort_by(compare_entries);
}

fn compare_entries(a: &FileEntry, b: &FileEntry) -> Ordering {
    b.is_dir()
        .cmp(&a.is_dir())
        .then_with(|| a.name().to_lowercase().cmp(&b.name().to_lowercase()))
        .then_with(|| a.name().cmp(b.name()))
}
