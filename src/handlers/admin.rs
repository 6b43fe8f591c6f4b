use axum::{extract::State, Extension, Json};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    models::{DatabaseInstance, User},
};

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub message: &'static str,
    pub users: i64,
    pub databases: i64,
}

pub async fn dashboard(
    State(pool): State<SqlitePool>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> AppResult<Json<DashboardResponse>> {
    // The stored role wins over the token claim, so deleted or demoted admins lose access.
    let Some(user) = User::find_by_id(&pool, claims.sub).await? else {
        tracing::warn!("Token for deleted user {} used on admin dashboard", claims.sub);
        return Err(AppError::Unauthorized("User no longer exists"));
    };

    if !user.is_admin() {
        tracing::warn!("User {} denied access to admin dashboard", user.username);
        return Err(AppError::Forbidden);
    }

    Ok(Json(DashboardResponse {
        message: "Admin dashboard",
        users: User::count(&pool).await?,
        databases: DatabaseInstance::count(&pool).await?,
    }))
}
