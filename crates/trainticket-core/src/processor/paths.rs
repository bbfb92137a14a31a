//! Lexical path helpers for run configuration.

use std::path::{Component, Path, PathBuf};

use crate::error::ConfigError;

/// Trim, make absolute and lexically clean a user-supplied directory.
pub(crate) fn absolute_clean(raw: &Path, label: &'static str) -> Result<PathBuf, ConfigError> {
    let trimmed = raw.to_string_lossy();
    let trimmed = trimmed.trim();
    let abs = std::path::absolute(trimmed)
        .map_err(|source| ConfigError::InvalidPath { label, source })?;
    Ok(clean(&abs))
}

/// Remove `.` components and resolve `..` against the preceding component.
pub(crate) fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

fn comparable(path: &Path) -> String {
    let s = clean(path).to_string_lossy().into_owned();
    if cfg!(windows) { s.to_lowercase() } else { s }
}

/// Both paths name the same directory.
pub(crate) fn same_dir(a: &Path, b: &Path) -> bool {
    comparable(a) == comparable(b)
}

/// `child` lies strictly below `parent`.
pub(crate) fn is_child_dir(child: &Path, parent: &Path) -> bool {
    let child = comparable(child);
    let mut parent = comparable(parent);
    if child == parent {
        return false;
    }
    if !parent.ends_with(std::path::MAIN_SEPARATOR) {
        parent.push(std::path::MAIN_SEPARATOR);
    }
    child.starts_with(&parent)
}
