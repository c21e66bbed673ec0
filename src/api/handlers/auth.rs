use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    api::state::AppState,
    auth::{AuthService, INVALID_CREDENTIALS, SESSION_COOKIE},
    error::AppError,
};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub email: String,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Response {
    let auth_service = &state.service_context.auth_service;

    match auth_service.login(&req.email, &req.password).await {
        Ok((admin, token)) => {
            let cookie = auth_service.create_session_cookie(&token);
            (
                jar.add(cookie),
                Json(LoginResponse {
                    message: "Login successful".to_string(),
                    email: admin.email,
                }),
            )
                .into_response()
        }
        Err(AppError::Unauthorized) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": INVALID_CREDENTIALS })),
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, StatusCode) {
    if let Some(session_cookie) = jar.get(SESSION_COOKIE) {
        if let Err(e) = state.service_context.auth_service
            .invalidate_session(session_cookie.value())
            .await
        {
            tracing::warn!("Failed to invalidate session: {}", e);
        }
    }

    (jar.add(AuthService::create_logout_cookie()), StatusCode::NO_CONTENT)
}
