use axum::{
    extract::{rejection::JsonRejection, Extension, Json, Path, State},
    http::StatusCode,
    response::Json as ResponseJson,
};

use crate::auth::AuthenticatedUser;
use crate::models::follow::FollowResponse;
use crate::models::user::{CreateUserRequest, PublicProfileResponse, UserResponse};
use crate::{AppState, Result};

pub async fn register(
    State(app_state): State<AppState>,
    payload: std::result::Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, ResponseJson<UserResponse>)> {
    let Json(request) = payload?;
    let user = app_state.user_service.register(request).await?;

    Ok((StatusCode::CREATED, ResponseJson(user)))
}

pub async fn get_me(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<ResponseJson<UserResponse>> {
    let me = app_state.user_service.get_user(user.user_id).await?;
    Ok(ResponseJson(me))
}

pub async fn get_profile(
    State(app_state): State<AppState>,
    Path(username): Path<String>,
) -> Result<ResponseJson<PublicProfileResponse>> {
    let profile = app_state.user_service.get_profile(&username).await?;
    Ok(ResponseJson(profile))
}

pub async fn follow_user(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(username): Path<String>,
) -> Result<(StatusCode, ResponseJson<FollowResponse>)> {
    let follow = app_state.follow_service.follow(user.user_id, &username).await?;
    Ok((StatusCode::CREATED, ResponseJson(follow)))
}

pub async fn unfollow_user(
    State(app_state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(username): Path<String>,
) -> Result<StatusCode> {
    app_state.follow_service.unfollow(user.user_id, &username).await?;
    Ok(StatusCode::NO_CONTENT)
}
