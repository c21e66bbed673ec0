#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{body::Body, http::Request, Router};
use cet_tracker::{
    api::{self, state::AppState},
    auth::AuthService,
    config::Settings,
    error::{AppError, Result},
    extraction::{ModelClient, ModelPrompt},
    repository::{AdminRepository, SqliteAdminRepository},
    service::ServiceContext,
    web,
};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

/// A single connection keeps every query on the same in-memory database.
pub async fn test_pool() -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Model client that answers every prompt with a canned reply.
pub struct StubModel {
    reply: std::result::Result<String, String>,
    pub prompts: Mutex<Vec<ModelPrompt>>,
}

impl StubModel {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(message.to_string()),
            prompts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl ModelClient for StubModel {
    fn name(&self) -> &str {
        "stub"
    }

    async fn complete(&self, prompt: &ModelPrompt) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.clone());
        self.reply.clone().map_err(AppError::External)
    }
}

pub struct TestApp {
    pub router: Router,
    pub ctx: Arc<ServiceContext>,
}

pub async fn test_app(model: Arc<StubModel>) -> anyhow::Result<TestApp> {
    let pool = test_pool().await?;
    let ctx = Arc::new(ServiceContext::new(pool, model, 24, false));
    let settings = Arc::new(Settings::default());

    let router = api::create_app(ctx.clone(), settings.clone())
        .merge(web::create_web_routes(AppState::new(ctx.clone(), settings)));

    Ok(TestApp { router, ctx })
}

/// Creates an admin and returns a `Cookie` header value for a live session.
pub async fn admin_cookie(ctx: &ServiceContext) -> anyhow::Result<String> {
    let repo = SqliteAdminRepository::new(ctx.db_pool.clone());
    let hash = AuthService::hash_password("correct horse").await?;
    let admin = repo.create("admin@example.com", &hash).await?;
    let (_session, token) = ctx.auth_service.create_session(&admin).await?;
    Ok(format!("session={}", token))
}

pub fn json_request(method: &str, uri: &str, cookie: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header("cookie", cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header("cookie", cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn form_request(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header("cookie", cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn body_json(response: axum::response::Response) -> anyhow::Result<serde_json::Value> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

pub async fn body_text(response: axum::response::Response) -> anyhow::Result<String> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(String::from_utf8(bytes.to_vec())?)
}
