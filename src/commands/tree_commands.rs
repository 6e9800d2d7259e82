use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::commands::{run_blocking, ApiJson};
use crate::error::AppError;
use crate::models::file_entry::Entry;
use crate::scope_path;
use crate::services::{git_service, tree_service};
use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct TreeRequest {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub root: String,
}

/// `POST /api/tree`: one level of `path`, annotated with the git status of
/// the repository at `root`.
pub async fn tree(
    State(state): State<SharedState>,
    ApiJson(req): ApiJson<TreeRequest>,
) -> Result<Json<Vec<Entry>>, AppError> {
    tracing::debug!(path = %req.path, root = %req.root, "tree");
    let entries = run_blocking(move || {
        let base = state.base_dir();
        let dir = scope_path::resolve(base, &req.path)?;
        let root = scope_path::resolve(base, &req.root)?;
        let status_map = git_service::status_map(&state.git, &root);
        tree_service::list_directory(base, &dir, &status_map)
    })
    .await?;
    Ok(Json(entries))
}

/// `GET /api/tree`: the whole base directory, nested up to the configured
/// depth.
pub async fn full_tree(State(state): State<SharedState>) -> Result<Json<Vec<Entry>>, AppError> {
    tracing::debug!("full tree");
    let entries = run_blocking(move || {
        let base = state.base_dir();
        let status_map = git_service::status_map(&state.git, base);
        tree_service::walk_tree(base, base, &status_map, state.config.max_depth)
    })
    .await?;
    Ok(Json(entries))
}
