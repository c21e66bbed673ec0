pub mod admin;
pub mod templates;
pub mod tracker;

use axum::{
    Router,
    routing::{get, post},
    middleware,
};
use crate::api::state::AppState;

pub fn create_web_routes(state: AppState) -> Router {
    Router::new()
        // Public tracker
        .route(
            "/",
            get(tracker::tracker_page).route_layer(middleware::from_fn_with_state(
                state.clone(),
                crate::api::middleware::auth::optional_auth,
            )),
        )

        // Auth pages
        .route("/login", get(templates::auth::login_page).post(templates::auth::login_handler))
        .route("/logout", post(templates::auth::logout_handler))

        // Admin dashboard
        .nest("/admin", admin::create_admin_routes(state.clone()))

        .with_state(state)
}
