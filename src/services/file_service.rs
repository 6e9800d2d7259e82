use crate::error::AppError;
use crate::models::file_entry::FolderEntry;
use crate::scope_path;
use crate::shell::safety::{validate_entry_name, validate_file_path};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

pub fn load(base: &Path, filename: &str) -> Result<String, AppError> {
    let path = scope_path::resolve(base, filename)?;
    if !path.is_file() {
        return Err(AppError::NotFound("File not found".to_string()));
    }
    match fs::read_to_string(&path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            Err(AppError::NotFound("File not found".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Replaces the file's content via a temp file renamed over the target, so
/// readers see either the old or the new content. Concurrent saves to the
/// same path are last-writer-wins.
pub fn save(base: &Path, filename: &str, content: &str) -> Result<(), AppError> {
    validate_file_path(filename)?;
    let path = scope_path::resolve(base, filename)?;
    if path.is_dir() {
        return Err(AppError::InvalidInput(format!(
            "cannot save over a directory: {filename}"
        )));
    }

    let parent = path
        .parent()
        .ok_or_else(|| AppError::InvalidInput(format!("invalid filename: {filename}")))?;
    fs::create_dir_all(parent)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    if let Ok(existing) = fs::metadata(&path) {
        tmp.as_file().set_permissions(existing.permissions())?;
    }
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(&path).map_err(|e| AppError::Io(e.error))?;
    Ok(())
}

/// Directory new entries are created in: `path`, or `root` when `path` is
/// exactly `/`. An empty `path` is the base directory.
fn target_dir<'a>(path: &'a str, root: &'a str) -> &'a str {
    if path == "/" {
        root
    } else {
        path
    }
}

fn resolve_new_entry(
    base: &Path,
    path: &str,
    root: &str,
    name: &str,
) -> Result<PathBuf, AppError> {
    validate_entry_name(name)?;
    let dir = target_dir(path, root).trim_end_matches('/');
    scope_path::resolve(base, &format!("{dir}/{}", name.trim()))
}

pub fn create_file(base: &Path, path: &str, root: &str, name: &str) -> Result<(), AppError> {
    let target = resolve_new_entry(base, path, root, name)?;
    if target == base {
        return Err(AppError::InvalidInput(format!("invalid name: {name}")));
    }
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }

    match fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
    {
        Ok(_) => {
            tracing::info!(path = %scope_path::relative(base, &target), "created file");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            Err(AppError::AlreadyExists("File already exists".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

pub fn create_folder(base: &Path, path: &str, root: &str, name: &str) -> Result<(), AppError> {
    let target = resolve_new_entry(base, path, root, name)?;
    if target == base || target.exists() {
        return Err(AppError::AlreadyExists("Folder already exists".to_string()));
    }
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }

    match fs::create_dir(&target) {
        Ok(()) => {
            tracing::info!(path = %scope_path::relative(base, &target), "created folder");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            Err(AppError::AlreadyExists("Folder already exists".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Subdirectories of `path`, sorted by name.
pub fn list_folders(base: &Path, path: &str) -> Result<Vec<FolderEntry>, AppError> {
    let dir = scope_path::resolve(base, path)?;
    if !dir.is_dir() {
        return Err(AppError::NotFound(format!("Directory not found: {path}")));
    }

    let mut folders = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let entry = entry?;
        let full_path = entry.path();
        if !full_path.is_dir() {
            continue;
        }
        folders.push(FolderEntry {
            name: entry.file_name().to_string_lossy().to_string(),
            path: scope_path::relative(base, &full_path),
        });
    }

    folders.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(folders)
}
