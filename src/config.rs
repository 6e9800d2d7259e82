use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

/// Command-line and environment configuration. Read once at startup and
/// never mutated afterwards.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "editor-bridge",
    version,
    about = "Serve a workspace directory and its git status to a browser code editor"
)]
pub struct Config {
    /// Directory every client path is resolved against
    #[arg(long, env = "EDITOR_BRIDGE_BASE_DIR", default_value = ".")]
    pub base_dir: PathBuf,

    /// Directory holding the editor UI assets
    #[arg(long, env = "EDITOR_BRIDGE_STATIC_DIR", default_value = "frontend")]
    pub static_dir: PathBuf,

    #[arg(long, env = "EDITOR_BRIDGE_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "EDITOR_BRIDGE_PORT", default_value_t = 5001)]
    pub port: u16,

    /// Depth limit for the full-tree listing
    #[arg(long, env = "EDITOR_BRIDGE_MAX_DEPTH", default_value_t = 16)]
    pub max_depth: usize,

    /// git executable used for status and branch lookups
    #[arg(long = "git", env = "EDITOR_BRIDGE_GIT", default_value = "git")]
    pub git_program: PathBuf,
}

impl Config {
    /// Creates the base directory if needed and replaces it with its
    /// canonical form, which every scope check relies on.
    pub fn prepare(mut self) -> anyhow::Result<Self> {
        fs::create_dir_all(&self.base_dir)
            .with_context(|| format!("creating base directory {}", self.base_dir.display()))?;
        self.base_dir = self
            .base_dir
            .canonicalize()
            .with_context(|| format!("resolving base directory {}", self.base_dir.display()))?;
        Ok(self)
    }

    /// Defaults rooted at `base_dir`, for tests and embedding.
    pub fn for_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            static_dir: PathBuf::from("frontend"),
            host: "127.0.0.1".to_string(),
            port: 5001,
            max_depth: 16,
            git_program: PathBuf::from("git"),
        }
    }
}
