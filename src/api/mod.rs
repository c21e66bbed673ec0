pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};
use std::sync::Arc;

use crate::{
    config::Settings,
    service::ServiceContext,
};
use state::AppState;

pub fn create_app(
    service_context: Arc<ServiceContext>,
    settings: Arc<Settings>,
) -> Router {
    let app_state = AppState::new(service_context, settings);

    Router::new()
        .route("/health", get(handlers::root::health_check))
        .route("/api", get(handlers::root::api_info))

        // Auth routes
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))

        // API routes
        .nest("/api", api_routes(app_state.clone()))

        .with_state(app_state)

        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/universities", university_routes(state.clone()))
        .nest("/announcements", announcement_routes(state.clone()))
        .nest("/admin", admin_routes(state))
}

fn university_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Reads are public
        .route("/", get(handlers::universities::list))
        .route("/:slug", get(handlers::universities::get))
        .merge(Router::new()
            .route("/", post(handlers::universities::create))
            .route(
                "/:slug",
                axum::routing::put(handlers::universities::update)
                    .delete(handlers::universities::delete),
            )
            .route_layer(axum::middleware::from_fn_with_state(
                state,
                middleware::auth::require_auth,
            ))
        )
}

fn announcement_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::announcements::list))
        // Anonymous callers only see live announcements
        .route(
            "/:id",
            get(handlers::announcements::get).route_layer(axum::middleware::from_fn_with_state(
                state.clone(),
                middleware::auth::optional_auth,
            )),
        )
        .merge(Router::new()
            .route("/all", get(handlers::announcements::list_all))
            .route("/", post(handlers::announcements::create))
            .route(
                "/:id",
                axum::routing::put(handlers::announcements::update)
                    .delete(handlers::announcements::delete),
            )
            .route_layer(axum::middleware::from_fn_with_state(
                state,
                middleware::auth::require_auth,
            ))
        )
}

fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/parse-announcement", post(handlers::extraction::parse_announcement))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::auth::require_auth,
        ))
}
