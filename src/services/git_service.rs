use std::path::{Path, PathBuf};

use crate::models::git_status::{GitStatus, StatusMap};
use crate::scope_path;
use crate::shell::git::Git;

pub const UNKNOWN_BRANCH: &str = "unknown";

/// Git status of every changed file under `repo_root`, keyed by
/// [`status_key`]. A directory that is missing or not inside a repository
/// yields an empty map.
pub fn status_map(git: &Git, repo_root: &Path) -> StatusMap {
    if !repo_root.is_dir() {
        return StatusMap::new();
    }

    let toplevel = match git.toplevel(repo_root) {
        Ok(top) => top,
        Err(e) => {
            tracing::debug!(root = %repo_root.display(), error = %e, "not a git repository");
            return StatusMap::new();
        }
    };
    let toplevel = toplevel.canonicalize().unwrap_or(toplevel);

    match git.status_porcelain(repo_root) {
        Ok(output) => parse_porcelain(&output, &toplevel),
        Err(e) => {
            tracing::debug!(root = %repo_root.display(), error = %e, "git status failed");
            StatusMap::new()
        }
    }
}

/// Branch checked out in the repository containing `root`, or
/// [`UNKNOWN_BRANCH`] when it cannot be determined.
pub fn current_branch(git: &Git, root: &Path) -> String {
    match git.current_branch(root) {
        Ok(branch) => branch,
        Err(e) => {
            tracing::debug!(root = %root.display(), error = %e, "branch lookup failed");
            UNKNOWN_BRANCH.to_string()
        }
    }
}

/// Parses `git status --porcelain` (v1) output. Each line is a two-character
/// code, a space, then a path relative to `toplevel`; renames and copies
/// read `XY OLD -> NEW`.
pub fn parse_porcelain(output: &str, toplevel: &Path) -> StatusMap {
    let mut map = StatusMap::new();

    for line in output.lines() {
        let (Some(code), Some(rest)) = (line.get(..2), line.get(3..)) else {
            continue;
        };
        if rest.is_empty() {
            continue;
        }

        let status = GitStatus::from_porcelain_code(code);
        // Either column can carry the rename, whatever status wins.
        let raw_path = if code.contains(['R', 'C']) {
            rest.split_once(" -> ").map(|(_, new)| new).unwrap_or(rest)
        } else {
            rest
        };

        let path = unquote(raw_path);
        map.insert(status_key(&toplevel.join(path)), status);
    }

    map
}

/// Lookup key shared by the status parser and the tree builder: the
/// canonical parent directory joined with the file name. Falls back to a
/// lexically cleaned path when the parent no longer exists.
pub fn status_key(path: &Path) -> PathBuf {
    let cleaned = scope_path::clean(path);
    match (cleaned.parent(), cleaned.file_name()) {
        (Some(parent), Some(name)) => match parent.canonicalize() {
            Ok(parent) => parent.join(name),
            Err(_) => cleaned,
        },
        _ => cleaned,
    }
}

/// Undoes git's C-style quoting of paths with special characters.
fn unquote(raw: &str) -> String {
    let Some(inner) = raw
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
    else {
        return raw.to_string();
    };

    let mut bytes = Vec::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0u8; 4];
            bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }
        match chars.next() {
            Some('n') => bytes.push(b'\n'),
            Some('t') => bytes.push(b'\t'),
            Some('r') => bytes.push(b'\r'),
            Some('a') => bytes.push(0x07),
            Some('b') => bytes.push(0x08),
            Some('f') => bytes.push(0x0c),
            Some('v') => bytes.push(0x0b),
            Some(d @ '0'..='7') => {
                let mut value = d.to_digit(8).unwrap_or(0);
                for _ in 0..2 {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                bytes.push(value as u8);
            }
            Some(other) => {
                let mut buf = [0u8; 4];
                bytes.extend_from_slice(other.encode_utf8(&mut buf).as_bytes());
            }
            None => bytes.push(b'\\'),
        }
    }

    String::from_utf8_lossy(&bytes).into_owned()
}
