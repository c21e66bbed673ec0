use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    api::state::AppState,
    controller::catalog::{matches, YearFilter},
    domain::{University, UniversityInput, UpdateUniversityRequest},
    error::Result,
};

#[derive(Debug, Deserialize)]
pub struct ListUniversitiesQuery {
    pub q: Option<String>,
    pub year: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListUniversitiesQuery>,
) -> Result<Json<Vec<University>>> {
    let universities = state.service_context.university_service.list().await?;

    let query = params.q.unwrap_or_default();
    let year = YearFilter::from_param(params.year.as_deref());

    Ok(Json(
        universities
            .into_iter()
            .filter(|u| matches(u, &query, &year))
            .collect(),
    ))
}

pub async fn get(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<University>> {
    let university = state.service_context.university_service.get(&slug).await?;
    Ok(Json(university))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<UniversityInput>,
) -> Result<(StatusCode, Json<University>)> {
    let university = state.service_context.university_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(university)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(request): Json<UpdateUniversityRequest>,
) -> Result<Json<University>> {
    let university = state.service_context.university_service
        .update(&slug, request)
        .await?;
    Ok(Json(university))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Value>> {
    state.service_context.university_service.delete(&slug).await?;
    Ok(Json(json!({ "success": true })))
}
