use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::shell::git::Git;

/// Read-only state shared by every request. Nothing here changes after
/// startup; the filesystem is the only shared mutable resource.
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    pub git: Git,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(config: Config) -> SharedState {
        let git = Git::new(config.git_program.clone());
        Arc::new(Self { config, git })
    }

    pub fn base_dir(&self) -> &Path {
        &self.config.base_dir
    }
}
