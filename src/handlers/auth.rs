use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    auth::{hash_password, verify_password, JwtService},
    error::{AppError, AppResult},
    extractors::JsonBody,
    models::{Role, User},
};

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub message: &'static str,
    pub id: Uuid,
}

pub async fn signup(
    State(pool): State<SqlitePool>,
    JsonBody(form): JsonBody<SignupRequest>,
) -> AppResult<(StatusCode, Json<SignupResponse>)> {
    let username = form.username.trim();
    if username.is_empty() {
        return Err(AppError::Validation("Username is required".to_string()));
    }

    if form.password.is_empty() {
        return Err(AppError::Validation("Password is required".to_string()));
    }

    let email = form.email.as_deref().map(str::trim).filter(|e| !e.is_empty());
    if let Some(email) = email {
        if !email.contains('@') {
            return Err(AppError::Validation("Valid email address is required".to_string()));
        }

        if User::find_by_email(&pool, email).await?.is_some() {
            return Err(AppError::Validation("Email address is already registered".to_string()));
        }
    }

    if User::find_by_username(&pool, username).await?.is_some() {
        return Err(AppError::Validation("Username is already taken".to_string()));
    }

    let password_hash =
        hash_password(&form.password).map_err(|e| AppError::Internal(e.to_string()))?;

    let user = User::create(&pool, username, email, &password_hash, Role::User).await?;
    tracing::info!("User {} signed up ({})", user.username, user.id);

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User created successfully",
            id: user.id,
        }),
    ))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
}

pub async fn login(
    State(pool): State<SqlitePool>,
    State(jwt): State<Arc<JwtService>>,
    JsonBody(form): JsonBody<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    // Signup stores trimmed values, so look them up the same way.
    let username = form.username.as_deref().map(str::trim);
    let email = form.email.as_deref().map(str::trim);

    let user = match (username, email) {
        (Some(name), _) if !name.is_empty() => match User::find_by_username(&pool, name).await? {
            Some(user) => Some(user),
            None => User::find_by_email(&pool, name).await?,
        },
        (_, Some(email)) if !email.is_empty() => User::find_by_email(&pool, email).await?,
        _ => return Err(AppError::Validation("Username or email is required".to_string())),
    };

    let Some(user) = user else {
        return Err(AppError::NotFound("User not found"));
    };

    if !verify_password(&form.password, &user.password_hash) {
        tracing::warn!("Failed login for {}", user.username);
        return Err(AppError::Unauthorized("Invalid credentials"));
    }

    let token = jwt.issue(&user)?;
    tracing::info!("User {} logged in", user.username);

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer",
    }))
}
