use askama::Template;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::{
    api::state::AppState,
    auth::{AuthService, INVALID_CREDENTIALS, SESSION_COOKIE},
    error::AppError,
    web::templates::HtmlTemplate,
};

#[derive(Template)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub email: String,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

// GET /login
pub async fn login_page(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Response {
    // Already signed in
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if let Ok(Some(_)) = state.service_context.auth_service.authenticate(cookie.value()).await {
            return Redirect::to("/admin").into_response();
        }
    }

    HtmlTemplate(LoginTemplate {
        email: String::new(),
        error: None,
    })
    .into_response()
}

// POST /login
pub async fn login_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let auth_service = &state.service_context.auth_service;

    match auth_service.login(&form.email, &form.password).await {
        Ok((_admin, token)) => {
            let jar = jar.add(auth_service.create_session_cookie(&token));
            (jar, Redirect::to("/admin")).into_response()
        }
        Err(e) => {
            let message = match e {
                AppError::Unauthorized => INVALID_CREDENTIALS.to_string(),
                other => {
                    tracing::error!("Login failed: {}", other);
                    "Something went wrong. Please try again.".to_string()
                }
            };
            HtmlTemplate(LoginTemplate {
                email: form.email,
                error: Some(message),
            })
            .into_response()
        }
    }
}

// POST /logout
pub async fn logout_handler(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Response {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if let Err(e) = state.service_context.auth_service.invalidate_session(cookie.value()).await {
            tracing::warn!("Failed to invalidate session: {}", e);
        }
    }

    (jar.add(AuthService::create_logout_cookie()), Redirect::to("/login")).into_response()
}
