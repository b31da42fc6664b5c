//! `/auth` handlers and the admin session guard.

use super::{
    AppState,
    error::{ApiError, MessageBody},
};
use crate::{auth::Session, errors::Error};
use axum::{
    Json,
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;

/// Body of `POST /auth/login`
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

pub(super) async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Session>, ApiError> {
    let session = state
        .auth
        .login(&body.username, &body.password)
        .await
        .map_err(ApiError::context("Failed to log in"))?;
    Ok(Json(session))
}

pub(super) async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Json<MessageBody> {
    if let Some(token) = bearer_token(&headers) {
        state.auth.logout(token).await;
    }
    MessageBody::new("Logged out")
}

pub(super) async fn session(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Session>, ApiError> {
    let token = bearer_token(&headers).ok_or(Error::Unauthorized)?;
    let session = state.auth.session(token).await?;
    Ok(Json(session))
}

/// Rejects admin requests without a live session when sessions are required.
pub(super) async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if state.auth.is_required() {
        let token = bearer_token(request.headers()).ok_or(Error::Unauthorized)?;
        state.auth.session(token).await?;
    }
    Ok(next.run(request).await)
}
