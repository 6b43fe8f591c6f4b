use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::{
    auth::{hash_password, AuthUser},
    error::{AppError, AppResult},
    extractors::JsonBody,
    models::{parse_id, User},
};

use super::MessageResponse;

pub async fn me(
    State(pool): State<SqlitePool>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> AppResult<Json<User>> {
    let user = User::find_by_id(&pool, claims.sub)
        .await?
        .ok_or(AppError::NotFound("User not found"))?;

    Ok(Json(user))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub new_password: String,
}

pub async fn change_password(
    State(pool): State<SqlitePool>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(id): Path<String>,
    JsonBody(form): JsonBody<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_id(&id).ok_or(AppError::NotFound("User not found"))?;

    if form.new_password.is_empty() {
        return Err(AppError::Validation("New password is required".to_string()));
    }

    let password_hash =
        hash_password(&form.new_password).map_err(|e| AppError::Internal(e.to_string()))?;

    if !User::update_password(&pool, id, &password_hash).await? {
        return Err(AppError::NotFound("User not found"));
    }

    tracing::info!("Password of user {} changed by {}", id, claims.username);
    Ok(Json(MessageResponse::new("Password changed successfully")))
}

pub async fn delete(
    State(pool): State<SqlitePool>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_id(&id).ok_or(AppError::NotFound("User not found"))?;

    if !User::delete(&pool, id).await? {
        return Err(AppError::NotFound("User not found"));
    }

    tracing::info!("User {} deleted by {}", id, claims.username);
    Ok(Json(MessageResponse::new("User deleted successfully")))
}
