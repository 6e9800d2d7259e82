use axum::extract::State;
use axum::http::{header, Uri};
use axum::response::{IntoResponse, Response};

use crate::commands::run_blocking;
use crate::error::AppError;
use crate::scope_path;
use crate::state::SharedState;

const INDEX_FILE: &str = "index.html";

/// Fallback route serving the editor UI from the static directory; `/`
/// maps to `index.html`.
pub async fn serve_static(State(state): State<SharedState>, uri: Uri) -> Response {
    let requested = uri.path().trim_start_matches('/').to_string();
    let result = run_blocking(move || {
        let root = state
            .config
            .static_dir
            .canonicalize()
            .map_err(|_| AppError::NotFound("File not found".to_string()))?;
        let name = if requested.is_empty() {
            INDEX_FILE
        } else {
            requested.as_str()
        };
        let path = scope_path::resolve(&root, name)?;
        if !path.is_file() {
            return Err(AppError::NotFound("File not found".to_string()));
        }
        let mime = mime_guess::from_path(&path).first_or_octet_stream();
        Ok((mime.to_string(), std::fs::read(&path)?))
    })
    .await;

    match result {
        Ok((mime, bytes)) => ([(header::CONTENT_TYPE, mime)], bytes).into_response(),
        Err(e) => e.into_response(),
    }
}
