use axum::{
    extract::{rejection::JsonRejection, Json, State},
    response::Json as ResponseJson,
};

use crate::models::user::{LoginRequest, TokenResponse};
use crate::{AppState, Result};

pub async fn login(
    State(app_state): State<AppState>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<ResponseJson<TokenResponse>> {
    let Json(request) = payload?;

    let (user, access_token) = app_state
        .user_service
        .authenticate(&request.identifier, &request.password)
        .await?;
    tracing::info!("🔑 AUTH: {} logged in", user.username);

    Ok(ResponseJson(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        expires_in: app_state.auth_service.token_lifetime_seconds(),
    }))
}
