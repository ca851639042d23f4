pub mod jwt;
pub mod middleware;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::{AppError, Result};
use jwt::JwtService;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user id
    pub username: String,
    pub iat: i64,
    pub exp: i64, // Expiration time
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub)
            .map_err(|_| AppError::AuthError("Invalid user ID in token".to_string()))
    }
}

/// Identity attached to a request once its bearer token has been verified.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub username: String,
}

pub struct AuthService {
    jwt: JwtService,
}

impl AuthService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            jwt: JwtService::new(
                &config.jwt_secret,
                config.jwt_algorithm,
                config.token_expiry_minutes,
            ),
        }
    }

    pub fn token_lifetime_seconds(&self) -> i64 {
        self.jwt.expiry_seconds()
    }

    pub fn generate_token(&self, user_id: Uuid, username: &str) -> Result<String> {
        self.jwt.encode_token(user_id, username)
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        self.jwt.decode_token(token)
    }

    /// Salted argon2id hash in PHC string form.
    pub fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::InternalError(format!("Failed to hash password: {}", e)))
    }

    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        let parsed = PasswordHash::new(hash)
            .map_err(|e| AppError::InternalError(format!("Stored password hash is invalid: {}", e)))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}
