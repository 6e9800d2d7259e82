use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

use crate::error::AppError;

/// Thin wrapper over the `git` executable. Every call is a one-shot,
/// synchronous process run in the given working directory.
#[derive(Debug, Clone)]
pub struct Git {
    program: PathBuf,
}

impl Git {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, dir: &Path, args: &[&str]) -> Result<String, AppError> {
        let start = Instant::now();
        let output = Command::new(&self.program)
            .args(args)
            .current_dir(dir)
            // status would otherwise refresh and lock the index
            .env("GIT_OPTIONAL_LOCKS", "0")
            .output()
            .map_err(|e| AppError::Git(format!("failed to run {}: {e}", self.program.display())))?;

        tracing::trace!(
            ?args,
            dir = %dir.display(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "git finished"
        );

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::Git(stderr.trim().to_string()));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    pub fn toplevel(&self, dir: &Path) -> Result<PathBuf, AppError> {
        let out = self.run(dir, &["rev-parse", "--show-toplevel"])?;
        let top = out.trim();
        if top.is_empty() {
            return Err(AppError::Git("empty toplevel".to_string()));
        }
        Ok(PathBuf::from(top))
    }

    /// Porcelain v1 output scoped to `dir`. Paths in it are relative to the
    /// repository top level.
    pub fn status_porcelain(&self, dir: &Path) -> Result<String, AppError> {
        self.run(
            dir,
            &[
                "-c",
                "core.quotePath=false",
                "status",
                "--porcelain",
                "--untracked-files=all",
                "--",
                ".",
            ],
        )
    }

    pub fn current_branch(&self, dir: &Path) -> Result<String, AppError> {
        let out = self.run(dir, &["rev-parse", "--abbrev-ref", "HEAD"])?;
        let branch = out.trim();
        if branch.is_empty() {
            return Err(AppError::Git("empty branch name".to_string()));
        }
        Ok(branch.to_string())
    }
}

impl Default for Git {
    fn default() -> Self {
        Self::new("git")
    }
}
