/// API route handlers
///
/// # Modules
///
/// - `auth`: Registration and login (public)
/// - `health`: Health check (public)
/// - `profile`: Profile read/update for the authenticated user
/// - `tasks`: Owner-scoped task CRUD

pub mod auth;
pub mod health;
pub mod profile;
pub mod tasks;

use axum::Json;
use serde::Serialize;

/// API index response
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    /// Welcome message
    pub message: String,

    /// Service status
    pub status: String,

    /// Top-level endpoint groups
    pub endpoints: Vec<String>,
}

/// API index handler
///
/// Public landing route describing the available endpoint groups.
pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        message: "TaskFlow API".to_string(),
        status: "running".to_string(),
        endpoints: vec![
            "/auth".to_string(),
            "/user/profile".to_string(),
            "/tasks".to_string(),
            "/health".to_string(),
        ],
    })
}
