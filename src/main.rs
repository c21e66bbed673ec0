use std::sync::Arc;
use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cet_tracker::{
    api,
    config::Settings,
    extraction::{ModelClient, OpenAiClient},
    service::ServiceContext,
    web,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cet_tracker=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let mut settings = Settings::new().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config: {}. Using defaults.", e);
        Settings::default()
    });
    if settings.extraction.api_key.is_none() {
        settings.extraction.api_key = std::env::var("OPENAI_API_KEY").ok();
    }
    if settings.extraction.api_key.is_none() {
        tracing::warn!("No model API key configured; AI fill requests will fail");
    }

    tracing::info!("Starting CET Tracker on {}:{}", settings.server.host, settings.server.port);

    // Initialize database
    let db_pool = SqlitePoolOptions::new()
        .max_connections(settings.database.max_connections)
        .connect(&settings.database.url)
        .await?;

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await?;

    let model_client: Arc<dyn ModelClient> = Arc::new(OpenAiClient::new(settings.extraction.clone())?);

    let service_context = Arc::new(ServiceContext::new(
        db_pool.clone(),
        model_client,
        settings.auth.session_duration_hours,
        settings.auth.secure_cookies,
    ));

    match service_context.auth_service.cleanup_expired_sessions().await {
        Ok(0) => {}
        Ok(n) => tracing::info!("Removed {} expired sessions", n),
        Err(e) => tracing::warn!("Failed to clean up sessions: {}", e),
    }

    let settings = Arc::new(settings);

    // Create API app
    let api_app = api::create_app(service_context.clone(), settings.clone());

    // Create web app state separately
    let web_app_state = api::state::AppState::new(service_context, settings.clone());
    let web_app = web::create_web_routes(web_app_state);

    // Combine API and web routes
    let app = api_app.merge(web_app);

    let listener = tokio::net::TcpListener::bind(
        format!("{}:{}", settings.server.host, settings.server.port)
    ).await?;

    tracing::info!("Server listening on {}", settings.server.base_url);

    axum::serve(listener, app).await?;

    Ok(())
}
