use crate::auth::{AuthService, AuthenticatedUser, Claims};
use crate::db::repository::UserRepository;
use crate::models::user::{CreateUserRequest, PublicProfileResponse, UserResponse};
use crate::models::User;
use crate::{AppError, Result};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

const USERNAME_MIN_LEN: usize = 3;
const USERNAME_MAX_LEN: usize = 50;
const PASSWORD_MIN_LEN: usize = 8;

// Shared by every credential failure
const INVALID_CREDENTIALS: &str = "Incorrect username or password";

pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
    auth_service: Arc<AuthService>,
}

impl UserService {
    pub fn new(user_repo: Arc<dyn UserRepository>, auth_service: Arc<AuthService>) -> Self {
        Self {
            user_repo,
            auth_service,
        }
    }

    pub async fn register(&self, request: CreateUserRequest) -> Result<UserResponse> {
        let username = request.username.trim().to_string();
        let email = request.email.trim().to_lowercase();
        validate_username(&username)?;
        validate_email(&email)?;
        validate_password(&request.password)?;

        let password_hash = self.auth_service.hash_password(&request.password)?;

        let user = User {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            is_active: true,
            created_at: Utc::now(),
        };

        let created_user = self.user_repo.create_user(&user).await?;
        tracing::info!("👤 USER: Registered {}", created_user.username);
        Ok(UserResponse::from(created_user))
    }

    /// Checks credentials and issues a bearer token.
    ///
    /// `identifier` may be a username or an email; anything containing `@`
    /// is looked up as an email.
    pub async fn authenticate(&self, identifier: &str, password: &str) -> Result<(UserResponse, String)> {
        let identifier = identifier.trim();
        let found = if identifier.contains('@') {
            self.user_repo.get_user_by_email(&identifier.to_lowercase()).await?
        } else {
            self.user_repo.get_user_by_username(identifier).await?
        };
        let user = found.ok_or_else(|| AppError::AuthError(INVALID_CREDENTIALS.to_string()))?;

        if !self.auth_service.verify_password(password, &user.password_hash)? {
            return Err(AppError::AuthError(INVALID_CREDENTIALS.to_string()));
        }
        if !user.is_active {
            return Err(AppError::AuthError("Inactive user".to_string()));
        }

        let token = self.auth_service.generate_token(user.id, &user.username)?;
        Ok((UserResponse::from(user), token))
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<UserResponse> {
        self.user_repo
            .get_user_by_id(user_id)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn get_profile(&self, username: &str) -> Result<PublicProfileResponse> {
        self.find_by_username(username)
            .await
            .map(PublicProfileResponse::from)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<User> {
        self.user_repo
            .get_user_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User '{}' not found", username)))
    }

    /// Maps verified token claims to a live account.
    ///
    /// A valid signature is not enough: the subject must still exist and be active.
    pub async fn resolve_identity(&self, claims: &Claims) -> Result<AuthenticatedUser> {
        let user_id = claims.user_id()?;
        let user = self
            .user_repo
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::AuthError("Could not validate credentials".to_string()))?;

        if !user.is_active {
            return Err(AppError::AuthError("Inactive user".to_string()));
        }

        Ok(AuthenticatedUser {
            user_id: user.id,
            username: user.username,
        })
    }
}

fn validate_username(username: &str) -> Result<()> {
    let len = username.chars().count();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return Err(AppError::ValidationError(format!(
            "Username must be between {} and {} characters",
            USERNAME_MIN_LEN, USERNAME_MAX_LEN
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        return Err(AppError::ValidationError(
            "Username may only contain letters, digits, '_', '.' and '-'".to_string(),
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<()> {
    let invalid = || AppError::ValidationError("Invalid email address".to_string());

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (host, tld) = domain.rsplit_once('.').ok_or_else(invalid)?;
    if host.is_empty() || tld.is_empty() || host.starts_with('.') {
        return Err(invalid());
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(AppError::ValidationError(format!(
            "Password must be at least {} characters",
            PASSWORD_MIN_LEN
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppConfig, MEMORY_DATABASE_URL};
    use crate::db::memory::MemoryDatabase;

    fn service() -> (UserService, Arc<AuthService>) {
        let config = AppConfig::from_lookup(|key| match key {
            "DATABASE_URL" => Some(MEMORY_DATABASE_URL.to_string()),
            _ => None,
        })
        .unwrap();
        let auth = Arc::new(AuthService::new(&config));
        (
            UserService::new(Arc::new(MemoryDatabase::new()), auth.clone()),
            auth,
        )
    }

    fn request(username: &str, email: &str, password: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_username_rules() {
        assert!(validate_username("ana").is_ok());
        assert!(validate_username("ana.maria_01-x").is_ok());
        assert!(validate_username("an").is_err());
        assert!(validate_username(&"a".repeat(51)).is_err());
        assert!(validate_username("ana maria").is_err());
        assert!(validate_username("ana/../x").is_err());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("ana@example.com").is_ok());
        assert!(validate_email("ana@mail.example.es").is_ok());
        assert!(validate_email("ana.example.com").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("ana@example").is_err());
        assert!(validate_email("ana@@example.com").is_err());
        assert!(validate_email("ana @example.com").is_err());
    }

    #[tokio::test]
    async fn test_register_then_login_by_username_or_email() {
        let (users, _) = service();
        let created = users
            .register(request("ana", "Ana@Example.com", "s3cret-pass"))
            .await
            .unwrap();
        assert_eq!(created.email, "ana@example.com");

        let (by_name, _) = users.authenticate("ana", "s3cret-pass").await.unwrap();
        let (by_email, _) = users.authenticate("ANA@example.com", "s3cret-pass").await.unwrap();
        assert_eq!(by_name.id, created.id);
        assert_eq!(by_email.id, created.id);
    }

    #[tokio::test]
    async fn test_login_failures_are_auth_errors() {
        let (users, _) = service();
        users
            .register(request("ana", "ana@example.com", "s3cret-pass"))
            .await
            .unwrap();

        assert!(matches!(
            users.authenticate("ana", "wrong-pass").await,
            Err(AppError::AuthError(_))
        ));
        assert!(matches!(
            users.authenticate("nobody", "s3cret-pass").await,
            Err(AppError::AuthError(_))
        ));
    }

    #[tokio::test]
    async fn test_register_rejects_short_password_and_duplicates() {
        let (users, _) = service();
        assert!(matches!(
            users.register(request("ana", "ana@example.com", "short")).await,
            Err(AppError::ValidationError(_))
        ));

        users
            .register(request("ana", "ana@example.com", "s3cret-pass"))
            .await
            .unwrap();
        assert!(matches!(
            users.register(request("ana", "other@example.com", "s3cret-pass")).await,
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            users.register(request("other", "ana@example.com", "s3cret-pass")).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_resolve_identity_requires_existing_user() {
        let (users, auth) = service();
        let created = users
            .register(request("ana", "ana@example.com", "s3cret-pass"))
            .await
            .unwrap();

        let claims = auth.verify_token(&auth.generate_token(created.id, "ana").unwrap()).unwrap();
        assert_eq!(users.resolve_identity(&claims).await.unwrap().user_id, created.id);

        let ghost = auth
            .verify_token(&auth.generate_token(Uuid::new_v4(), "ghost").unwrap())
            .unwrap();
        assert!(matches!(
            users.resolve_identity(&ghost).await,
            Err(AppError::AuthError(_))
        ));
    }
}
