use axum::{extract::State, response::IntoResponse, Json};

use crate::{models::ApiResponse, AppState};

pub async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    let upload_folder = &state.file_manager.config().upload_folder;

    Json(ApiResponse::success(serde_json::json!({
        "status": "healthy",
        "app": state.app_name,
        "version": state.version,
        "upload_folder_present": upload_folder.is_dir(),
        "staging_present": state.staging.dir().is_dir(),
    })))
}
