use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    api::{middleware::auth::CurrentAdmin, state::AppState},
    domain::{Announcement, CreateAnnouncementRequest, UpdateAnnouncementRequest},
    error::{AppError, Result},
};

/// Announcements currently inside their display window.
pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<Vec<Announcement>>> {
    let announcements = state.service_context.announcement_service.list_live().await?;
    Ok(Json(announcements))
}

pub async fn list_all(
    State(state): State<AppState>,
) -> Result<Json<Vec<Announcement>>> {
    let announcements = state.service_context.announcement_service.list_all().await?;
    Ok(Json(announcements))
}

pub async fn get(
    State(state): State<AppState>,
    admin: Option<Extension<CurrentAdmin>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Announcement>> {
    let announcement = state.service_context.announcement_service.get(id).await?;

    if admin.is_none() && !announcement.is_live_at(Utc::now()) {
        return Err(AppError::NotFound("Announcement not found".to_string()));
    }

    Ok(Json(announcement))
}

pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateAnnouncementRequest>,
) -> Result<(StatusCode, Json<Announcement>)> {
    let announcement = state.service_context.announcement_service.create(request).await?;
    Ok((StatusCode::CREATED, Json(announcement)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateAnnouncementRequest>,
) -> Result<Json<Announcement>> {
    let announcement = state.service_context.announcement_service
        .update(id, request)
        .await?;
    Ok(Json(announcement))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.service_context.announcement_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
