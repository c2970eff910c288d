//! Root-folder guards for destructive operations.
//!
//! Every check here is lexical: paths are normalised as strings and never
//! looked up on disk.

use std::path::{Component, Path, PathBuf};

use crate::error::{CoreError, CoreResult};

/// Lexically normalises `path`: drops `.` components and trailing
/// separators, and folds `..` into the preceding component. `..` never
/// climbs above the root.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let climbable = matches!(out.components().next_back(), Some(Component::Normal(_)));
                if climbable {
                    out.pop();
                } else if !has_root(&out) {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Returns `true` if `path` normalises to a filesystem root (`/`, `C:\`, a
/// UNC share root).
pub fn is_root(path: &Path) -> bool {
    let normalized = normalize(path);
    has_root(&normalized)
        && !normalized
            .components()
            .any(|c| matches!(c, Component::Normal(_) | Component::ParentDir))
}

/// The root of the volume `path` lives on: `/` on Unix, the drive or share
/// root on Windows. Relative paths yield themselves unchanged.
pub fn volume_root(path: &Path) -> PathBuf {
    let root: PathBuf = path
        .components()
        .take_while(|c| matches!(c, Component::Prefix(_) | Component::RootDir))
        .collect();
    if root.as_os_str().is_empty() {
        path.to_path_buf()
    } else {
        root
    }
}

/// Refuses to copy into a root directory.
pub fn check_copy(dst_dir: &Path) -> CoreResult<()> {
    if is_root(dst_dir) {
        return Err(reject(format!(
            "Copy to root folder {} not allowed for safety",
            normalize(dst_dir).display()
        )));
    }
    Ok(())
}

/// Refuses to move into a root directory or out of one.
pub fn check_move(src: &Path, dst_dir: &Path) -> CoreResult<()> {
    if is_root(dst_dir) {
        return Err(reject(format!(
            "Move to root folder {} not allowed for safety",
            normalize(dst_dir).display()
        )));
    }
    if is_root(&parent_of(src)) {
        return Err(reject(format!(
            "Moving {} from root folder not allowed for safety",
            src.display()
        )));
    }
    Ok(())
}

/// Refuses to delete anything that sits directly in a root directory.
pub fn check_delete(path: &Path) -> CoreResult<()> {
    if is_root(&parent_of(path)) {
        return Err(reject(format!(
            "Deleting {} from root folder not allowed for safety",
            path.display()
        )));
    }
    Ok(())
}

/// Normalised parent; a path with no parent (a root itself) is its own.
fn parent_of(path: &Path) -> PathBuf {
    let normalized = normalize(path);
    match normalized.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => normalized,
    }
}

fn has_root(path: &Path) -> bool {
    path.components()
        .any(|c| matches!(c, Component::RootDir | Component::Prefix(_)))
}

fn reject(message: String) -> CoreError {
    tracing::warn!(%message, "operation refused");
    CoreError::SafetyRejection(message)
}
