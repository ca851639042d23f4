// Authentication middleware for protecting routes
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::{AppError, AppState, Result};

/// Verifies the bearer token and stores the resulting
/// [`AuthenticatedUser`](crate::auth::AuthenticatedUser) in request extensions.
pub async fn require_auth(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let token = bearer_token(request.headers())?;

    let claims = app_state.auth_service.verify_token(token)?;
    let user = app_state.user_service.resolve_identity(&claims).await?;

    tracing::debug!("🔐 Authenticated request from {}", user.username);
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

fn bearer_token(headers: &axum::http::HeaderMap) -> Result<&str> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::AuthError("Missing authorization header".to_string()))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AppError::AuthError("Invalid authorization header format".to_string()))?;

    auth_str
        .strip_prefix("Bearer ")
        .or_else(|| auth_str.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            AppError::AuthError("Authorization header must start with 'Bearer '".to_string())
        })
}
