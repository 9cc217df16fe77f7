use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

use crate::{
    error::{DepotError, Result},
    files::{validate_file_name, UploadDescriptor},
    models::ApiResponse,
    AppState,
};

#[derive(Debug, Serialize)]
pub struct FileUploadResponse {
    pub name: String,
    pub path: PathBuf,
    pub size_kb: u64,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub path: PathBuf,
}

/// Stages the `file` field of a multipart body and hands it to the file
/// manager. The staged copy is removed whether or not promotion succeeds.
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<FileUploadResponse>>> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        DepotError::BadRequest(format!("Failed to read multipart field: {}", e))
    })? {
        if field.name() != Some("file") {
            continue;
        }

        let name = field.file_name().unwrap_or("").to_string();

        let data = field.bytes().await.map_err(|e| {
            DepotError::BadRequest(format!("Failed to read file data: {}", e))
        })?;

        let tmp_path = state.staging.stage(&data).await?;
        let upload = UploadDescriptor {
            name: name.clone(),
            size: data.len() as u64,
            tmp_path: tmp_path.clone(),
        };

        let stored = state.file_manager.upload_file(&upload).await;
        state.staging.discard(&tmp_path).await;
        let path = stored?;

        return Ok(Json(ApiResponse::success(FileUploadResponse {
            name,
            path,
            size_kb: upload.size.div_ceil(1024),
        })));
    }

    Err(crate::files::ValidationError::MissingName.into())
}

pub async fn read_file(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response> {
    validate_file_name(&name)?;

    let path = state.file_manager.config().upload_folder.join(&name);
    let content = state.file_manager.read_local_file(&path).await?;
    let mime = mime_guess::from_path(&path).first_or(mime::TEXT_PLAIN_UTF_8);

    Ok(([(header::CONTENT_TYPE, mime.to_string())], content).into_response())
}

pub async fn delete_file(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<String>>> {
    validate_file_name(&name)?;

    let path = state.file_manager.config().upload_folder.join(&name);
    state.file_manager.delete_local_file(&path).await?;
    info!("Deleted {}", path.display());

    Ok(Json(ApiResponse::success(name)))
}

/// Looks in the upload folder first, then in each configured search root.
pub async fn search_file(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Response> {
    if query.name.trim().is_empty() {
        return Err(DepotError::BadRequest("Search name cannot be empty".to_string()));
    }

    let mut roots = vec![state.file_manager.config().upload_folder.clone()];
    roots.extend(state.search_roots.iter().cloned());

    let response = match state.file_manager.search_file(&roots, &query.name).await? {
        Some(path) => Json(ApiResponse::success(SearchResponse { path })).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<SearchResponse>::error(format!(
                "No file matching '{}'",
                query.name
            ))),
        )
            .into_response(),
    };

    Ok(response)
}
