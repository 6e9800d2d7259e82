use std::path::{Component, Path, PathBuf};

use crate::error::AppError;

pub fn normalize(path: &str) -> String {
    let mut normalized = path.trim().replace('\\', "/");
    while normalized.ends_with('/') && normalized.len() > 1 {
        normalized.pop();
    }
    normalized
}

pub fn is_within_scope(path: &Path, root: &Path) -> bool {
    path == root || path.starts_with(root)
}

/// Resolves a client-supplied path against `base`.
///
/// Client paths are always relative to the base directory: a leading `/` is
/// ignored and `""` or `"/"` name the base itself. `..` may climb back up to
/// the base but never above it, and the deepest existing ancestor of the
/// result must canonicalize to a location inside the base (no symlink
/// escapes). `base` is expected to be canonical already.
pub fn resolve(base: &Path, client_path: &str) -> Result<PathBuf, AppError> {
    let normalized = normalize(client_path);
    let mut resolved = base.to_path_buf();
    let mut depth = 0usize;

    for component in Path::new(&normalized).components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return Err(AppError::PathEscape(client_path.to_string()));
                }
                resolved.pop();
                depth -= 1;
            }
            Component::Normal(part) => {
                resolved.push(part);
                depth += 1;
            }
        }
    }

    let anchor = existing_ancestor(&resolved);
    let canonical = anchor.canonicalize()?;
    if !is_within_scope(&canonical, base) {
        return Err(AppError::PathEscape(client_path.to_string()));
    }

    Ok(resolved)
}

fn existing_ancestor(path: &Path) -> &Path {
    let mut current = path;
    while !current.exists() {
        match current.parent() {
            Some(parent) => current = parent,
            None => break,
        }
    }
    current
}

/// Slash-separated form of `path` relative to `base`, `""` for the base itself.
pub fn relative(base: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(base).unwrap_or(path);
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Lexically removes `.` and `..` segments without touching the filesystem.
pub fn clean(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !cleaned.pop() {
                    cleaned.push(component);
                }
            }
            other => cleaned.push(other),
        }
    }
    cleaned
}
