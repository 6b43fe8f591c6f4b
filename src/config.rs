use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub bootstrap: BootstrapConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Token lifetime in seconds. Zero issues tokens without an `exp` claim.
    pub token_ttl_secs: u64,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .finish()
    }
}

/// Longest accepted token lifetime: ten years.
pub const MAX_TOKEN_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

impl AuthConfig {
    /// Values above [`MAX_TOKEN_TTL_SECS`] are clamped to it.
    pub fn token_ttl(&self) -> Option<chrono::Duration> {
        match self.token_ttl_secs {
            0 => None,
            secs => chrono::Duration::try_seconds(secs.min(MAX_TOKEN_TTL_SECS) as i64),
        }
    }
}

/// Credentials for the admin account created at startup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BootstrapConfig {
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
}

impl BootstrapConfig {
    pub fn admin_credentials(&self) -> Option<(&str, &str)> {
        match (self.admin_username.as_deref(), self.admin_password.as_deref()) {
            (Some(name), Some(pass)) if !name.is_empty() && !pass.is_empty() => Some((name, pass)),
            _ => None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Config {
            server: ServerConfig {
                host: var("ADMIN_PANEL_SERVER__HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: var("ADMIN_PANEL_SERVER__PORT")
                    .or_else(|| var("PORT"))
                    .unwrap_or_else(|| "3000".to_string())
                    .parse()
                    .map_err(|_| ConfigError::InvalidPort)?,
            },
            database: DatabaseConfig {
                url: var("ADMIN_PANEL_DATABASE__URL")
                    .unwrap_or_else(|| "sqlite://admin_panel.db?mode=rwc".to_string()),
                max_connections: var("ADMIN_PANEL_DATABASE__MAX_CONNECTIONS")
                    .unwrap_or_else(|| "5".to_string())
                    .parse()
                    .map_err(|_| ConfigError::InvalidNumber("ADMIN_PANEL_DATABASE__MAX_CONNECTIONS"))?,
            },
            auth: AuthConfig {
                jwt_secret: var("ADMIN_PANEL_AUTH__JWT_SECRET")
                    .filter(|secret| !secret.is_empty())
                    .ok_or(ConfigError::MissingJwtSecret)?,
                token_ttl_secs: var("ADMIN_PANEL_AUTH__TOKEN_TTL_SECS")
                    .unwrap_or_else(|| "3600".to_string())
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs <= MAX_TOKEN_TTL_SECS)
                    .ok_or(ConfigError::InvalidNumber("ADMIN_PANEL_AUTH__TOKEN_TTL_SECS"))?,
            },
            bootstrap: BootstrapConfig {
                admin_username: var("ADMIN_PANEL_BOOTSTRAP__ADMIN_USERNAME"),
                admin_password: var("ADMIN_PANEL_BOOTSTRAP__ADMIN_PASSWORD"),
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("ADMIN_PANEL_AUTH__JWT_SECRET environment variable is required")]
    MissingJwtSecret,
    #[error("Invalid port number")]
    InvalidPort,
    #[error("{0} must be a non-negative integer")]
    InvalidNumber(&'static str),
}
