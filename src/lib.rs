pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::{require_auth, JwtService};
use crate::config::AuthConfig;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub jwt: Arc<JwtService>,
}

impl AppState {
    pub fn new(pool: SqlitePool, auth: &AuthConfig) -> Self {
        Self {
            pool,
            jwt: Arc::new(JwtService::new(auth)),
        }
    }
}

impl axum::extract::FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl axum::extract::FromRef<AppState> for Arc<JwtService> {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}

pub fn build_app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/me", get(handlers::user::me))
        .route("/users/:id", delete(handlers::user::delete))
        .route("/users/:id/password", patch(handlers::user::change_password))
        .route(
            "/databases",
            get(handlers::database::list).post(handlers::database::create),
        )
        .route(
            "/databases/:id",
            get(handlers::database::show).delete(handlers::database::delete),
        )
        .route("/databases/:id/addUser", post(handlers::database::add_user))
        .route(
            "/databases/:id/removeUser/:user_id",
            patch(handlers::database::remove_user),
        )
        .route(
            "/databases/:id/entries/:entry/addUser",
            post(handlers::database::add_user_to_entry),
        )
        .route(
            "/databases/:id/entries/:entry/removeUser/:user_id",
            patch(handlers::database::remove_user_from_entry),
        )
        .route("/admin/dashboard", get(handlers::admin::dashboard))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(handlers::home::health))
        .route("/signup", post(handlers::auth::signup))
        .route("/login", post(handlers::auth::login))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
