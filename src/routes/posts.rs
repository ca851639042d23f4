use axum::{
    extract::{rejection::JsonRejection, Extension, Json, Path, State},
    http::StatusCode,
    response::Json as ResponseJson,
};
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::models::post::{PostContentRequest, PostResponse};
use crate::{AppError, AppState, Result};

// A malformed id cannot name an existing post
fn parse_post_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound("Post not found".to_string()))
}

pub async fn create_post(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: std::result::Result<Json<PostContentRequest>, JsonRejection>,
) -> Result<(StatusCode, ResponseJson<PostResponse>)> {
    let Json(request) = payload?;
    let post = app_state
        .post_service
        .create_post(user.user_id, &request.content)
        .await?;

    Ok((StatusCode::CREATED, ResponseJson(post)))
}

pub async fn get_posts(State(app_state): State<AppState>) -> Result<ResponseJson<Vec<PostResponse>>> {
    let posts = app_state.post_service.list_posts().await?;
    Ok(ResponseJson(posts))
}

pub async fn get_feed(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<ResponseJson<Vec<PostResponse>>> {
    let posts = app_state.post_service.get_feed(user.user_id).await?;
    tracing::debug!("📰 FEED: {} posts for {}", posts.len(), user.username);
    Ok(ResponseJson(posts))
}

pub async fn get_post(
    State(app_state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<ResponseJson<PostResponse>> {
    let post = app_state.post_service.get_post(parse_post_id(&post_id)?).await?;
    Ok(ResponseJson(post))
}

pub async fn update_post(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(post_id): Path<String>,
    payload: std::result::Result<Json<PostContentRequest>, JsonRejection>,
) -> Result<ResponseJson<PostResponse>> {
    let post_id = parse_post_id(&post_id)?;
    let Json(request) = payload?;

    let post = app_state
        .post_service
        .update_post(user.user_id, post_id, &request.content)
        .await?;
    Ok(ResponseJson(post))
}

pub async fn delete_post(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(post_id): Path<String>,
) -> Result<StatusCode> {
    let post_id = parse_post_id(&post_id)?;
    app_state.post_service.delete_post(user.user_id, post_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
