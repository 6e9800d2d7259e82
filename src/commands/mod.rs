pub mod file_commands;
pub mod git_commands;
pub mod static_commands;
pub mod tree_commands;

use axum::extract::FromRequest;
use serde::Serialize;

use crate::error::AppError;

/// `Json` body extractor whose rejections go through [`AppError`], so a
/// malformed body gets the same JSON error shape as every other failure.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, Serialize)]
pub struct SuccessBody {
    pub success: bool,
}

impl SuccessBody {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Runs filesystem or git work off the async executor.
pub async fn run_blocking<T, F>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::General(format!("worker task failed: {e}")))?
}
