use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};

use crate::auth::middleware::require_auth;
use crate::routes::{auth, posts, users};
use crate::AppState;

pub fn routes(app_state: &AppState) -> Router<AppState> {
    let public_routes = Router::new()
        .route("/", get(root))
        .route("/health", get(api_health))
        .route("/users", post(users::register))
        .route("/login", post(auth::login))
        .route("/users/:username", get(users::get_profile))
        .route("/posts", get(posts::get_posts))
        .route("/posts/", get(posts::get_posts))
        .route("/posts/:post_id", get(posts::get_post));

    let protected_routes = Router::new()
        .route("/users/me", get(users::get_me))
        .route(
            "/users/:username/follow",
            post(users::follow_user).delete(users::unfollow_user),
        )
        .route("/posts/feed", get(posts::get_feed))
        .route("/posts", post(posts::create_post))
        .route("/posts/", post(posts::create_post))
        .route(
            "/posts/:post_id",
            put(posts::update_post).delete(posts::delete_post),
        )
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    public_routes.merge(protected_routes)
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "Welcome to the microblog API"
    }))
}

async fn api_health(State(app_state): State<AppState>) -> (StatusCode, Json<Value>) {
    let (status, database) = match app_state.db.health_check().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(e) => {
            tracing::error!("❌ HEALTH: Database check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };

    (
        status,
        Json(json!({
            "status": if status == StatusCode::OK { "healthy" } else { "degraded" },
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "database": {
                "backend": app_state.db.backend_name(),
                "status": database
            },
            "sentiment_scorer": app_state.sentiment_service.scorer_name()
        })),
    )
}
