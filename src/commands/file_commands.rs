use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::commands::{run_blocking, ApiJson, SuccessBody};
use crate::error::AppError;
use crate::models::file_entry::FolderEntry;
use crate::services::file_service;
use crate::state::SharedState;

#[derive(Debug, Serialize)]
pub struct LoadResponse {
    pub content: String,
}

/// `GET /api/load/{*filename}`
pub async fn load_file(
    State(state): State<SharedState>,
    Path(filename): Path<String>,
) -> Result<Json<LoadResponse>, AppError> {
    tracing::debug!(%filename, "load");
    let content = run_blocking(move || file_service::load(state.base_dir(), &filename)).await?;
    Ok(Json(LoadResponse { content }))
}

#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    pub filename: String,
    pub content: String,
}

/// `POST /api/save`
pub async fn save_file(
    State(state): State<SharedState>,
    ApiJson(req): ApiJson<SaveRequest>,
) -> Result<Json<SuccessBody>, AppError> {
    tracing::debug!(filename = %req.filename, bytes = req.content.len(), "save");
    run_blocking(move || file_service::save(state.base_dir(), &req.filename, &req.content))
        .await?;
    Ok(Json(SuccessBody::ok()))
}

#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub root: String,
    pub name: String,
}

/// `POST /api/create-file`
pub async fn create_file(
    State(state): State<SharedState>,
    ApiJson(req): ApiJson<CreateRequest>,
) -> Result<Json<SuccessBody>, AppError> {
    run_blocking(move || {
        file_service::create_file(state.base_dir(), &req.path, &req.root, &req.name)
    })
    .await?;
    Ok(Json(SuccessBody::ok()))
}

/// `POST /api/create-folder`
pub async fn create_folder(
    State(state): State<SharedState>,
    ApiJson(req): ApiJson<CreateRequest>,
) -> Result<Json<SuccessBody>, AppError> {
    run_blocking(move || {
        file_service::create_folder(state.base_dir(), &req.path, &req.root, &req.name)
    })
    .await?;
    Ok(Json(SuccessBody::ok()))
}

#[derive(Debug, Deserialize)]
pub struct FoldersRequest {
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Serialize)]
pub struct FoldersResponse {
    pub folders: Vec<FolderEntry>,
}

/// Error for the folder picker: same status as [`AppError`], with an empty
/// `folders` list alongside the message.
#[derive(Debug)]
pub struct FoldersFailure(pub AppError);

#[derive(Debug, Serialize)]
struct FoldersErrorBody {
    success: bool,
    error: String,
    folders: Vec<FolderEntry>,
}

impl IntoResponse for FoldersFailure {
    fn into_response(self) -> Response {
        let status = self.0.report();
        let body = FoldersErrorBody {
            success: false,
            error: self.0.to_string(),
            folders: Vec::new(),
        };
        (status, Json(body)).into_response()
    }
}

/// `POST /api/folders`
pub async fn list_folders(
    State(state): State<SharedState>,
    req: Result<ApiJson<FoldersRequest>, AppError>,
) -> Result<Json<FoldersResponse>, FoldersFailure> {
    let ApiJson(req) = req.map_err(FoldersFailure)?;
    let folders = run_blocking(move || file_service::list_folders(state.base_dir(), &req.path))
        .await
        .map_err(FoldersFailure)?;
    Ok(Json(FoldersResponse { folders }))
}
