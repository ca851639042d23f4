use std::env;

use jsonwebtoken::Algorithm;

use crate::{AppError, Result};

/// `DATABASE_URL` value that selects the in-memory store
pub const MEMORY_DATABASE_URL: &str = "memory://";

const DEV_JWT_SECRET: &str = "dev-secret-change-in-production";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_algorithm: Algorithm,
    pub token_expiry_minutes: i64,
    pub sentiment_service_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| AppError::ValidationError("DATABASE_URL must be set".to_string()))?;

        let jwt_secret = match lookup("JWT_SECRET").or_else(|| lookup("SECRET_KEY")) {
            Some(secret) if !secret.is_empty() => secret,
            _ if database_url == MEMORY_DATABASE_URL => {
                tracing::warn!("⚠️ CONFIG: JWT_SECRET not set, using development secret");
                DEV_JWT_SECRET.to_string()
            }
            _ => {
                return Err(AppError::ValidationError(
                    "JWT_SECRET (or SECRET_KEY) must be set".to_string(),
                ))
            }
        };

        let jwt_algorithm = parse_algorithm(
            &lookup("JWT_ALGORITHM")
                .or_else(|| lookup("ALGORITHM"))
                .unwrap_or_else(|| "HS256".to_string()),
        )?;

        let token_expiry_minutes = match lookup("ACCESS_TOKEN_EXPIRE_MINUTES") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|minutes| *minutes > 0)
                .ok_or_else(|| {
                    AppError::ValidationError(format!(
                        "ACCESS_TOKEN_EXPIRE_MINUTES must be a positive integer, got '{}'",
                        raw
                    ))
                })?,
            None => 30,
        };

        let server_port = match lookup("PORT").or_else(|| lookup("SERVER_PORT")) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                AppError::ValidationError(format!("PORT must be a port number, got '{}'", raw))
            })?,
            None => 8000,
        };

        Ok(Self {
            server_host: lookup("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            server_port,
            database_url,
            jwt_secret,
            jwt_algorithm,
            token_expiry_minutes,
            sentiment_service_url: lookup("SENTIMENT_SERVICE_URL").filter(|url| !url.is_empty()),
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn uses_memory_database(&self) -> bool {
        self.database_url == MEMORY_DATABASE_URL
    }
}

// Only HMAC algorithms: the token secret is a shared string
fn parse_algorithm(name: &str) -> Result<Algorithm> {
    match name.trim().to_uppercase().as_str() {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        other => Err(AppError::ValidationError(format!(
            "Unsupported token algorithm '{}', expected HS256, HS384 or HS512",
            other
        ))),
    }
}
