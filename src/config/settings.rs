//! Application settings loaded from environment variables.

use std::env;

use domain::{DEFAULT_JWT_EXPIRATION_HOURS, MIN_JWT_SECRET_LENGTH};

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_DB_MAX_CONNECTIONS, DEFAULT_DB_PORT, DEFAULT_SERVER_HOST,
    DEFAULT_SERVER_PORT,
};
use crate::errors::{AppError, AppResult};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    /// Rate limiting is enabled only when Redis is configured
    pub redis_url: Option<String>,
    jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub server_host: String,
    pub server_port: u16,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("database_max_connections", &self.database_max_connections)
            .field("redis_url", &self.redis_url.as_ref().map(|_| "[REDACTED]"))
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .finish()
    }
}

impl Config {
    /// Build a configuration with defaults for everything but the database
    /// and the signing secret.
    pub fn new(database_url: impl Into<String>, jwt_secret: impl Into<String>) -> AppResult<Self> {
        let jwt_secret = jwt_secret.into();
        check_secret(&jwt_secret)?;

        Ok(Self {
            database_url: database_url.into(),
            database_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            redis_url: None,
            jwt_secret,
            jwt_expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
        })
    }

    /// Load configuration from environment variables.
    ///
    /// # Errors
    /// Fails if JWT_SECRET is missing in a release build or is too short.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) => secret,
            Err(_) if cfg!(debug_assertions) => {
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                "dev-secret-key-minimum-32-chars!!".to_string()
            }
            Err(_) => {
                return Err(AppError::internal(
                    "JWT_SECRET environment variable must be set in production",
                ))
            }
        };

        let mut config = Self::new(database_url_from_env(), jwt_secret)?;
        config.database_max_connections = parse_var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS);
        config.redis_url = env::var("REDIS_URL").ok().filter(|url| !url.is_empty());
        config.jwt_expiration_hours =
            parse_var("JWT_EXPIRATION_HOURS").unwrap_or(DEFAULT_JWT_EXPIRATION_HOURS);
        if let Ok(host) = env::var("SERVER_HOST") {
            config.server_host = host;
        }
        config.server_port = parse_var("SERVER_PORT").unwrap_or(DEFAULT_SERVER_PORT);

        Ok(config)
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn check_secret(secret: &str) -> AppResult<()> {
    if secret.len() < MIN_JWT_SECRET_LENGTH {
        return Err(AppError::internal(format!(
            "JWT_SECRET must be at least {} characters long",
            MIN_JWT_SECRET_LENGTH
        )));
    }
    Ok(())
}

/// `DATABASE_URL` wins; otherwise assemble a PostgreSQL URL from `DB_*` parts.
fn database_url_from_env() -> String {
    if let Ok(url) = env::var("DATABASE_URL") {
        return url;
    }

    match (env::var("DB_HOST"), env::var("DB_NAME")) {
        (Ok(host), Ok(name)) => assemble_database_url(
            &host,
            parse_var("DB_PORT").unwrap_or(DEFAULT_DB_PORT),
            &name,
            &env::var("DB_USER").unwrap_or_else(|_| "postgres".to_string()),
            &env::var("DB_PASSWORD").unwrap_or_default(),
        ),
        _ => DEFAULT_DATABASE_URL.to_string(),
    }
}

fn assemble_database_url(host: &str, port: u16, name: &str, user: &str, password: &str) -> String {
    if password.is_empty() {
        format!("postgres://{}@{}:{}/{}", user, host, port, name)
    } else {
        format!("postgres://{}:{}@{}:{}/{}", user, password, host, port, name)
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}
