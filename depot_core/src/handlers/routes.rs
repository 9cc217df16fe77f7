//! Route table for the file intake

use axum::{
    routing::{get, post},
    Router,
};

use super::{files, health};
use crate::AppState;

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::handle_health))
        .route("/api/files", post(files::upload_file))
        .route(
            "/api/files/:name",
            get(files::read_file).delete(files::delete_file),
        )
        .route("/api/files/search", get(files::search_file))
}
