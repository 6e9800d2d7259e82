use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::AppError;
use crate::models::file_entry::{Children, Entry};
use crate::models::git_status::StatusMap;
use crate::scope_path;
use crate::services::git_service::status_key;

/// One level of `dir`, in directory enumeration order. Folders are emitted
/// as expandable markers; their contents are fetched by a follow-up call.
pub fn list_directory(
    base: &Path,
    dir: &Path,
    status_map: &StatusMap,
) -> Result<Vec<Entry>, AppError> {
    if !dir.is_dir() {
        return Err(AppError::NotFound(format!(
            "Directory not found: {}",
            scope_path::relative(base, dir)
        )));
    }

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let file_name = entry.file_name().to_string_lossy().to_string();
        let full_path = entry.path();
        let rel_path = scope_path::relative(base, &full_path);

        // follows symlinks; dangling links are listed as files
        if full_path.is_dir() {
            entries.push(Entry::lazy_folder(file_name, rel_path));
        } else {
            let git_status = status_map.get(&status_key(&full_path)).cloned();
            entries.push(Entry::file(file_name, rel_path, git_status));
        }
    }

    Ok(entries)
}

struct Frame {
    name: String,
    path: String,
    children: Vec<Entry>,
}

impl Frame {
    fn into_entry(self) -> Entry {
        Entry::Folder {
            name: self.name,
            path: self.path,
            children: Children::Nested(self.children),
        }
    }
}

/// Folds frames deeper than `depth` into their parents, leaving the parent
/// of an entry at `depth` on top.
fn unwind_to(stack: &mut Vec<Frame>, depth: usize) {
    while stack.len() > depth.max(1) {
        let frame = stack.pop().map(Frame::into_entry);
        if let (Some(folder), Some(parent)) = (frame, stack.last_mut()) {
            parent.children.push(folder);
        }
    }
}

fn escapes_base(base: &Path, path: &Path) -> bool {
    match path.canonicalize() {
        Ok(target) => !scope_path::is_within_scope(&target, base),
        Err(_) => false,
    }
}

/// Whole subtree of `dir`, at most `max_depth` levels deep. Symlinks are
/// followed while they stay inside `base`; a link pointing elsewhere, or back
/// at one of its ancestors, is listed without its contents. Dangling links
/// are listed as files. Folders at the depth limit have no children.
pub fn walk_tree(
    base: &Path,
    dir: &Path,
    status_map: &StatusMap,
    max_depth: usize,
) -> Result<Vec<Entry>, AppError> {
    if !dir.is_dir() {
        return Err(AppError::NotFound(format!(
            "Directory not found: {}",
            scope_path::relative(base, dir)
        )));
    }

    // stack[d] collects the children of the folder at depth d
    let mut stack = vec![Frame {
        name: String::new(),
        path: scope_path::relative(base, dir),
        children: Vec::new(),
    }];

    let mut walker = WalkDir::new(dir)
        .follow_links(true)
        .min_depth(1)
        .max_depth(max_depth.max(1))
        .into_iter();

    while let Some(result) = walker.next() {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => {
                let dangling = e
                    .path()
                    .filter(|p| p.symlink_metadata().is_ok_and(|m| m.file_type().is_symlink()))
                    .filter(|p| !p.exists());
                match (dangling, e.loop_ancestor()) {
                    (Some(link), None) => {
                        unwind_to(&mut stack, e.depth());
                        if let Some(parent) = stack.last_mut() {
                            let name = link
                                .file_name()
                                .map(|n| n.to_string_lossy().to_string())
                                .unwrap_or_default();
                            parent.children.push(Entry::file(
                                name,
                                scope_path::relative(base, link),
                                status_map.get(&status_key(link)).cloned(),
                            ));
                        }
                    }
                    (_, Some(_)) => tracing::warn!(error = %e, "skipping symlink loop"),
                    (None, None) => tracing::warn!(error = %e, "skipping unreadable entry"),
                }
                continue;
            }
        };

        unwind_to(&mut stack, entry.depth());

        let file_name = entry.file_name().to_string_lossy().to_string();
        let rel_path = scope_path::relative(base, entry.path());

        if entry.path_is_symlink() && escapes_base(base, entry.path()) {
            tracing::warn!(path = %rel_path, "not following symlink outside base directory");
            if entry.file_type().is_dir() {
                walker.skip_current_dir();
            }
            if let Some(parent) = stack.last_mut() {
                parent.children.push(if entry.file_type().is_dir() {
                    Frame {
                        name: file_name,
                        path: rel_path,
                        children: Vec::new(),
                    }
                    .into_entry()
                } else {
                    Entry::file(file_name, rel_path, None)
                });
            }
            continue;
        }

        if entry.file_type().is_dir() {
            stack.push(Frame {
                name: file_name,
                path: rel_path,
                children: Vec::new(),
            });
        } else if let Some(parent) = stack.last_mut() {
            let git_status = status_map.get(&status_key(entry.path())).cloned();
            parent
                .children
                .push(Entry::file(file_name, rel_path, git_status));
        }
    }

    unwind_to(&mut stack, 1);

    Ok(stack.pop().map(|root| root.children).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::git_status::GitStatus;
    use std::path::PathBuf;

    fn base() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let canonical = dir.path().canonicalize().unwrap();
        (dir, canonical)
    }

    fn find<'a>(entries: &'a [Entry], name: &str) -> &'a Entry {
        entries
            .iter()
            .find(|e| e.name() == name)
            .unwrap_or_else(|| panic!("missing entry {name}"))
    }

    #[test]
    fn lazy_listing_marks_folders_and_files() {
        let (_guard, base) = base();
        fs::create_dir_all(base.join("a/c")).unwrap();
        fs::write(base.join("a/b.txt"), "hello").unwrap();

        let entries = list_directory(&base, &base.join("a"), &StatusMap::new()).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(
            find(&entries, "b.txt"),
            &Entry::file("b.txt".into(), "a/b.txt".into(), None)
        );
        assert_eq!(
            find(&entries, "c"),
            &Entry::lazy_folder("c".into(), "a/c".into())
        );
    }

    #[test]
    fn lazy_listing_annotates_git_status() {
        let (_guard, base) = base();
        fs::write(base.join("changed.rs"), "fn main() {}").unwrap();
        fs::write(base.join("clean.rs"), "").unwrap();

        let mut map = StatusMap::new();
        map.insert(base.join("changed.rs"), GitStatus::Modified);

        let entries = list_directory(&base, &base, &map).unwrap();

        match find(&entries, "changed.rs") {
            Entry::File { git_status, .. } => assert_eq!(git_status, &Some(GitStatus::Modified)),
            other => panic!("expected file, got {other:?}"),
        }
        match find(&entries, "clean.rs") {
            Entry::File { git_status, .. } => assert_eq!(git_status, &None),
            other => panic!("expected file, got {other:?}"),
        }
    }

    #[test]
    fn lazy_listing_order_is_stable_within_a_directory() {
        let (_guard, base) = base();
        for name in ["zeta", "alpha", "mid"] {
            fs::write(base.join(name), "").unwrap();
        }

        let first = list_directory(&base, &base, &StatusMap::new()).unwrap();
        let second = list_directory(&base, &base, &StatusMap::new()).unwrap();

        assert_eq!(first.len(), 3);
        assert_eq!(first, second);
    }

    #[test]
    fn listing_missing_directory_is_not_found() {
        let (_guard, base) = base();
        let result = list_directory(&base, &base.join("nope"), &StatusMap::new());
        assert!(matches!(result, Err(AppError::NotFound(_))));

        fs::write(base.join("file.txt"), "").unwrap();
        let result = list_directory(&base, &base.join("file.txt"), &StatusMap::new());
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn walk_nests_children() {
        let (_guard, base) = base();
        fs::create_dir_all(base.join("src/bin")).unwrap();
        fs::write(base.join("src/lib.rs"), "").unwrap();
        fs::write(base.join("src/bin/tool.rs"), "").unwrap();
        fs::write(base.join("README.md"), "").unwrap();

        let tree = walk_tree(&base, &base, &StatusMap::new(), 16).unwrap();
        assert_eq!(tree.len(), 2);

        let Entry::Folder { children: Children::Nested(src), path, .. } = find(&tree, "src") else {
            panic!("src should be a nested folder");
        };
        assert_eq!(path, "src");
        assert_eq!(src.len(), 2);
        assert_eq!(find(src, "lib.rs").path(), "src/lib.rs");

        let Entry::Folder { children: Children::Nested(bin), .. } = find(src, "bin") else {
            panic!("bin should be a nested folder");
        };
        assert_eq!(bin.len(), 1);
        assert_eq!(bin[0].path(), "src/bin/tool.rs");
    }

    #[test]
    fn walk_stops_at_max_depth() {
        let (_guard, base) = base();
        fs::create_dir_all(base.join("a/b/c")).unwrap();
        fs::write(base.join("a/b/c/deep.txt"), "").unwrap();

        let tree = walk_tree(&base, &base, &StatusMap::new(), 2).unwrap();

        let Entry::Folder { children: Children::Nested(a), .. } = find(&tree, "a") else {
            panic!("a should be a nested folder");
        };
        let Entry::Folder { children: Children::Nested(b), .. } = find(a, "b") else {
            panic!("b should be a nested folder");
        };
        assert!(b.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn walk_skips_symlink_cycles() {
        let (_guard, base) = base();
        fs::create_dir_all(base.join("loop")).unwrap();
        fs::write(base.join("loop/file.txt"), "").unwrap();
        std::os::unix::fs::symlink(base.join("loop"), base.join("loop/again")).unwrap();

        let tree = walk_tree(&base, &base, &StatusMap::new(), 64).unwrap();

        let Entry::Folder { children: Children::Nested(inner), .. } = find(&tree, "loop") else {
            panic!("loop should be a nested folder");
        };
        assert_eq!(inner.len(), 1);
        assert_eq!(inner[0].name(), "file.txt");
    }

    #[cfg(unix)]
    #[test]
    fn walk_lists_outside_links_without_contents() {
        let (_guard, base) = base();
        let outside = tempfile::tempdir().unwrap();
        fs::write(outside.path().join("secret.txt"), "hidden").unwrap();
        fs::write(outside.path().join("note.txt"), "hidden").unwrap();
        std::os::unix::fs::symlink(outside.path(), base.join("link")).unwrap();
        std::os::unix::fs::symlink(outside.path().join("note.txt"), base.join("note")).unwrap();

        let tree = walk_tree(&base, &base, &StatusMap::new(), 16).unwrap();

        assert_eq!(tree.len(), 2);
        assert_eq!(
            find(&tree, "link"),
            &Entry::Folder {
                name: "link".into(),
                path: "link".into(),
                children: Children::Nested(Vec::new()),
            }
        );
        assert_eq!(find(&tree, "note"), &Entry::file("note".into(), "note".into(), None));
    }

    #[cfg(unix)]
    #[test]
    fn walk_follows_links_that_stay_inside_base() {
        let (_guard, base) = base();
        fs::create_dir_all(base.join("real")).unwrap();
        fs::write(base.join("real/a.txt"), "").unwrap();
        std::os::unix::fs::symlink(base.join("real"), base.join("alias")).unwrap();

        let tree = walk_tree(&base, &base, &StatusMap::new(), 16).unwrap();

        let Entry::Folder { children: Children::Nested(alias), .. } = find(&tree, "alias") else {
            panic!("alias should be a nested folder");
        };
        assert_eq!(alias.len(), 1);
        assert_eq!(alias[0].path(), "alias/a.txt");
    }

    #[cfg(unix)]
    #[test]
    fn dangling_links_are_files_in_both_listings() {
        let (_guard, base) = base();
        fs::create_dir_all(base.join("dir")).unwrap();
        std::os::unix::fs::symlink(base.join("gone.txt"), base.join("dir/broken")).unwrap();

        let lazy = list_directory(&base, &base.join("dir"), &StatusMap::new()).unwrap();
        let eager = walk_tree(&base, &base, &StatusMap::new(), 16).unwrap();

        let expected = Entry::file("broken".into(), "dir/broken".into(), None);
        assert_eq!(lazy, vec![expected.clone()]);
        let Entry::Folder { children: Children::Nested(dir), .. } = find(&eager, "dir") else {
            panic!("dir should be a nested folder");
        };
        assert_eq!(dir, &vec![expected]);
    }
}
