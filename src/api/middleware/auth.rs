use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;

use crate::{
    api::state::AppState,
    auth::SESSION_COOKIE,
    domain::Admin,
    error::{AppError, Result},
};

#[derive(Clone)]
pub struct CurrentAdmin {
    pub admin: Admin,
}

async fn resolve_admin(state: &AppState, jar: &CookieJar) -> Result<Option<Admin>> {
    let Some(session_cookie) = jar.get(SESSION_COOKIE) else {
        return Ok(None);
    };

    state.service_context.auth_service
        .authenticate(session_cookie.value())
        .await
}

/// API guard: requests without a live session get 401.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> std::result::Result<Response, AppError> {
    let admin = resolve_admin(&state, &jar)
        .await?
        .ok_or(AppError::Unauthorized)?;

    request.extensions_mut().insert(CurrentAdmin { admin });

    Ok(next.run(request).await)
}

/// Page guard: sends anonymous visitors to the login page instead.
pub async fn require_auth_redirect(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    match resolve_admin(&state, &jar).await {
        Ok(Some(admin)) => {
            request.extensions_mut().insert(CurrentAdmin { admin });
            next.run(request).await
        }
        Ok(None) => Redirect::to("/login").into_response(),
        Err(e) => {
            tracing::error!("Session lookup failed: {}", e);
            Redirect::to("/login").into_response()
        }
    }
}

/// Attaches the admin when a session exists; never rejects.
pub async fn optional_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    if let Ok(Some(admin)) = resolve_admin(&state, &jar).await {
        request.extensions_mut().insert(CurrentAdmin { admin });
    }

    next.run(request).await
}
