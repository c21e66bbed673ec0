use axum::{body::Bytes, extract::State, Json};

use crate::{
    api::state::AppState,
    domain::ExtractedFields,
    error::{AppError, Result},
    extraction::ExtractionRequest,
};

/// `POST /api/admin/parse-announcement`
///
/// The body is read as raw bytes so a missing content type or malformed JSON
/// is reported as a 400 in the usual error shape.
pub async fn parse_announcement(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ExtractedFields>> {
    let request: ExtractionRequest = serde_json::from_slice(&body)
        .map_err(|_| AppError::BadRequest("Request body must be a JSON object".to_string()))?;

    let fields = state.service_context.extraction_service.extract(request).await?;
    Ok(Json(fields))
}
