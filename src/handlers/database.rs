use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::collections::HashSet;
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    extractors::JsonBody,
    models::{parse_id, DatabaseEntry, DatabaseInstance, NewInstance, User},
};

use super::MessageResponse;

#[derive(Debug, Serialize)]
pub struct InstanceResponse {
    pub id: Uuid,
    pub name: String,
    pub host: String,
    pub port: u16,
    pub users: Vec<Uuid>,
    pub databases: Vec<DatabaseEntry>,
}

impl From<DatabaseInstance> for InstanceResponse {
    fn from(instance: DatabaseInstance) -> Self {
        Self {
            id: instance.id,
            name: instance.name,
            host: instance.host,
            port: instance.port,
            users: instance.users.0,
            databases: instance.databases.0,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateInstanceRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub databases: Vec<DatabaseEntry>,
}

pub async fn create(
    State(pool): State<SqlitePool>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    JsonBody(form): JsonBody<CreateInstanceRequest>,
) -> AppResult<(StatusCode, Json<InstanceResponse>)> {
    let name = form.name.trim();
    let host = form.host.trim();

    if name.is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }

    if host.is_empty() {
        return Err(AppError::Validation("Host is required".to_string()));
    }

    let mut databases = Vec::with_capacity(form.databases.len());
    let mut seen = HashSet::new();
    for entry in form.databases {
        let entry_name = entry.name.trim().to_string();
        if entry_name.is_empty() {
            return Err(AppError::Validation("Database names must not be empty".to_string()));
        }
        if !seen.insert(entry_name.clone()) {
            return Err(AppError::Validation(format!(
                "Duplicate database name: {}",
                entry_name
            )));
        }
        databases.push(DatabaseEntry {
            name: entry_name,
            users: entry.users,
        });
    }

    let instance = DatabaseInstance::create(
        &pool,
        NewInstance {
            name: name.to_string(),
            host: host.to_string(),
            port: form.port,
            databases,
        },
    )
    .await?;

    tracing::info!("Database {} ({}) created by {}", instance.name, instance.id, claims.username);
    Ok((StatusCode::CREATED, Json(instance.into())))
}

pub async fn list(State(pool): State<SqlitePool>) -> AppResult<Json<Vec<InstanceResponse>>> {
    let instances = DatabaseInstance::all(&pool).await?;
    Ok(Json(instances.into_iter().map(Into::into).collect()))
}

pub async fn show(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> AppResult<Json<InstanceResponse>> {
    let instance = find_instance(&pool, &id).await?;
    Ok(Json(instance.into()))
}

pub async fn delete(
    State(pool): State<SqlitePool>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = parse_id(&id).ok_or(AppError::NotFound("Database not found"))?;

    if !DatabaseInstance::delete(&pool, id).await? {
        return Err(AppError::NotFound("Database not found"));
    }

    tracing::info!("Database {} deleted by {}", id, claims.username);
    Ok(Json(MessageResponse::new("Database deleted successfully")))
}

#[derive(Debug, Deserialize)]
pub struct AddUserRequest {
    #[serde(default)]
    pub username: String,
}

pub async fn add_user(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
    JsonBody(form): JsonBody<AddUserRequest>,
) -> AppResult<Json<MessageResponse>> {
    grant(&pool, &id, None, &form.username).await
}

pub async fn add_user_to_entry(
    State(pool): State<SqlitePool>,
    Path((id, entry)): Path<(String, String)>,
    JsonBody(form): JsonBody<AddUserRequest>,
) -> AppResult<Json<MessageResponse>> {
    grant(&pool, &id, Some(&entry), &form.username).await
}

pub async fn remove_user(
    State(pool): State<SqlitePool>,
    Path((id, user_id)): Path<(String, String)>,
) -> AppResult<Json<MessageResponse>> {
    revoke(&pool, &id, None, &user_id).await
}

pub async fn remove_user_from_entry(
    State(pool): State<SqlitePool>,
    Path((id, entry, user_id)): Path<(String, String, String)>,
) -> AppResult<Json<MessageResponse>> {
    revoke(&pool, &id, Some(&entry), &user_id).await
}

async fn find_instance(pool: &SqlitePool, id: &str) -> AppResult<DatabaseInstance> {
    let Some(id) = parse_id(id) else {
        return Err(AppError::NotFound("Database not found"));
    };

    DatabaseInstance::find_by_id(pool, id)
        .await?
        .ok_or(AppError::NotFound("Database not found"))
}

// Lookup and write are separate statements; a concurrent delete in between is not detected.
async fn grant(
    pool: &SqlitePool,
    id: &str,
    entry: Option<&str>,
    username: &str,
) -> AppResult<Json<MessageResponse>> {
    let user = User::find_by_username(pool, username)
        .await?
        .ok_or(AppError::NotFound("User not found"))?;

    let mut instance = find_instance(pool, id).await?;

    let added = instance
        .grant(entry, user.id)
        .ok_or(AppError::NotFound("Database entry not found"))?;

    if added {
        instance.save_access(pool).await?;
        tracing::info!("User {} granted access to database {}", user.id, instance.id);
    }

    Ok(Json(MessageResponse::new("User assigned to database successfully")))
}

async fn revoke(
    pool: &SqlitePool,
    id: &str,
    entry: Option<&str>,
    user_id: &str,
) -> AppResult<Json<MessageResponse>> {
    let mut instance = find_instance(pool, id).await?;

    if entry.is_some() && instance.access_list_mut(entry).is_none() {
        return Err(AppError::NotFound("Database entry not found"));
    }

    // A malformed id can never be in the list.
    if let Some(user_id) = parse_id(user_id) {
        if instance.revoke(entry, user_id) == Some(true) {
            instance.save_access(pool).await?;
            tracing::info!("User {} access to database {} revoked", user_id, instance.id);
        }
    }

    Ok(Json(MessageResponse::new("User access revoked successfully")))
}
