use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::{
    auth::token::{Claims, JwtService},
    error::AppError,
};

/// Verified token claims, inserted into request extensions by [`require_auth`].
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

pub async fn require_auth(
    State(jwt): State<Arc<JwtService>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())?;

    let claims = jwt.verify(token).map_err(|e| {
        tracing::debug!("Rejected bearer token: {}", e);
        AppError::Unauthorized("Invalid or expired token")
    })?;

    request.extensions_mut().insert(AuthUser(claims));
    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AppError::Unauthorized("Authorization token required"))?
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid authorization header"))?;

    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .ok_or(AppError::Unauthorized("Authorization header must use the Bearer scheme"))?;

    if token.is_empty() {
        return Err(AppError::Unauthorized("Authorization token required"));
    }

    Ok(token)
}
