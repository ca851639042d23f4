pub mod api;
pub mod auth;
pub mod posts;
pub mod users;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;

pub fn create_routes(app_state: &AppState) -> Router<AppState> {
    Router::new().merge(api::routes(app_state))
}

/// Full application: routes, request tracing and CORS, bound to `app_state`.
pub fn build_app(app_state: AppState) -> Router {
    create_routes(&app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
