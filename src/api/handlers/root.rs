use axum::{http::StatusCode, Json, response::IntoResponse};
use serde_json::json;

pub async fn api_info() -> impl IntoResponse {
    Json(json!({
        "name": "CET Tracker API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "College entrance test schedules for Philippine universities",
        "status": "operational",
        "endpoints": {
            "health": "/health",
            "universities": "/api/universities",
            "announcements": "/api/announcements",
            "auth": "/auth/login"
        }
    }))
}

pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    })))
}
