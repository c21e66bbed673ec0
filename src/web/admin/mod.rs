pub mod announcements;
pub mod universities;

use axum::{
    Router,
    routing::get,
    middleware,
};
use crate::api::state::AppState;

pub fn create_admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Universities
        .route("/", get(universities::universities_page))
        .route(
            "/universities/new",
            get(universities::new_university_page).post(universities::create_university),
        )
        .route(
            "/universities/:slug/edit",
            get(universities::edit_university_page).post(universities::update_university),
        )
        .route(
            "/universities/:slug/delete",
            get(universities::delete_university_page).post(universities::delete_university),
        )
        // Announcements
        .route("/announcements", get(announcements::announcements_page))
        .route(
            "/announcements/new",
            get(announcements::new_announcement_page).post(announcements::create_announcement),
        )
        .route(
            "/announcements/:id/edit",
            get(announcements::edit_announcement_page).post(announcements::update_announcement),
        )
        .route(
            "/announcements/:id/delete",
            get(announcements::delete_announcement_page).post(announcements::delete_announcement),
        )
        // Sends anonymous visitors to the login page
        .route_layer(middleware::from_fn_with_state(
            state,
            crate::api::middleware::auth::require_auth_redirect,
        ))
}
