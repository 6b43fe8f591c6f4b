use axum::{extract::State, Json};
use serde::Serialize;
use sqlx::SqlitePool;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}

pub async fn health(State(pool): State<SqlitePool>) -> Json<HealthResponse> {
    let database = match sqlx::query("SELECT 1").execute(&pool).await {
        Ok(_) => "ok",
        Err(e) => {
            tracing::error!("Health check query failed: {}", e);
            "unavailable"
        }
    };

    Json(HealthResponse {
        status: "ok",
        database,
    })
}
