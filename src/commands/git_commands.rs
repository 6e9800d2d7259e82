use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::commands::run_blocking;
use crate::error::AppError;
use crate::scope_path;
use crate::services::git_service;
use crate::state::SharedState;

#[derive(Debug, Serialize)]
pub struct BranchResponse {
    pub branch: String,
}

async fn branch_for(state: SharedState, root: String) -> Result<Json<BranchResponse>, AppError> {
    tracing::debug!(%root, "branch");
    let branch = run_blocking(move || {
        let dir = scope_path::resolve(state.base_dir(), &root)?;
        Ok(git_service::current_branch(&state.git, &dir))
    })
    .await?;
    Ok(Json(BranchResponse { branch }))
}

/// `GET /api/branch/{*root}`
pub async fn branch(
    State(state): State<SharedState>,
    Path(root): Path<String>,
) -> Result<Json<BranchResponse>, AppError> {
    branch_for(state, root).await
}

/// `GET /api/branch`: branch of the base directory itself.
pub async fn base_branch(State(state): State<SharedState>) -> Result<Json<BranchResponse>, AppError> {
    branch_for(state, String::new()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::state::AppState;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use serde_json::{json, Value};

    fn test_state() -> (tempfile::TempDir, SharedState) {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::for_base_dir(dir.path()).prepare().unwrap();
        (dir, AppState::new(config))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn non_repository_branch_is_unknown() {
        let (_guard, state) = test_state();
        std::fs::create_dir_all(state.base_dir().join("plain")).unwrap();

        let response = branch(State(state.clone()), Path("plain".to_string()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"branch": "unknown"}));

        let response = base_branch(State(state)).await.into_response();
        assert_eq!(body_json(response).await, json!({"branch": "unknown"}));
    }

    #[tokio::test]
    async fn missing_root_branch_is_unknown() {
        let (_guard, state) = test_state();
        let response = branch(State(state), Path("does/not/exist".to_string()))
            .await
            .into_response();
        assert_eq!(body_json(response).await["branch"], "unknown");
    }

    #[tokio::test]
    async fn branch_outside_base_is_403() {
        let (_guard, state) = test_state();
        let response = branch(State(state), Path("../..".to_string()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
