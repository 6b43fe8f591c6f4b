use sqlx::SqlitePool;

use crate::{
    auth::hash_password,
    config::BootstrapConfig,
    error::{AppError, AppResult},
    models::{Role, User},
};

const SCHEMA: &str = include_str!("../../sql/schema.sql");

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    tracing::info!("Running database migrations...");

    for statement in SCHEMA.split(';') {
        let statement = statement.trim();
        if statement.is_empty() || statement.starts_with("--") {
            continue;
        }

        sqlx::query(statement).execute(pool).await?;
    }

    tracing::info!("Migrations completed successfully");
    Ok(())
}

/// Creates the configured admin account unless a user with that name already exists.
///
/// Returns `true` when an account was created.
pub async fn bootstrap_admin(pool: &SqlitePool, bootstrap: &BootstrapConfig) -> AppResult<bool> {
    let Some((username, password)) = bootstrap.admin_credentials() else {
        return Ok(false);
    };

    if User::find_by_username(pool, username).await?.is_some() {
        tracing::debug!("Admin account {} already present", username);
        return Ok(false);
    }

    let password_hash = hash_password(password).map_err(|e| AppError::Internal(e.to_string()))?;
    let admin = User::create(pool, username, None, &password_hash, Role::Admin).await?;

    tracing::info!("Created admin account {} ({})", admin.username, admin.id);
    Ok(true)
}
