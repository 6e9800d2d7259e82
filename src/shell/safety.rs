use crate::error::AppError;
use std::path::{Component, Path};

const FORBIDDEN_CHARS: &[char] = &['\0', '\n', '\r'];

/// Validates the `name` of a file or folder about to be created. Nested
/// names (`pkg/mod.py`) are allowed; containment in the base directory is
/// checked separately when the full path is resolved.
pub fn validate_entry_name(name: &str) -> Result<(), AppError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput("name is empty".to_string()));
    }

    if let Some(c) = trimmed.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
        return Err(AppError::InvalidInput(format!(
            "name contains forbidden character: {c:?}"
        )));
    }

    let has_normal = Path::new(trimmed)
        .components()
        .any(|c| matches!(c, Component::Normal(_)));
    if !has_normal {
        return Err(AppError::InvalidInput(format!("invalid name: {name}")));
    }

    Ok(())
}

/// Validates a client-supplied file path that must name a file, not the
/// base directory itself.
pub fn validate_file_path(path: &str) -> Result<(), AppError> {
    let trimmed = path.trim().trim_matches(|c| c == '/' || c == '\\');
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput("filename is empty".to_string()));
    }
    if trimmed.contains('\0') {
        return Err(AppError::InvalidInput(
            "filename contains a NUL byte".to_string(),
        ));
    }
    Ok(())
}
