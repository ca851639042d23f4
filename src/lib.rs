// Library modules for the microblog API
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::{AppError, Result};

// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: db::DatabaseClient,
    pub auth_service: Arc<auth::AuthService>,
    pub user_service: Arc<services::UserService>,
    pub post_service: Arc<services::PostService>,
    pub follow_service: Arc<services::FollowService>,
    pub sentiment_service: Arc<services::SentimentService>,
}

impl AppState {
    pub async fn new(config: AppConfig) -> Result<Self> {
        let db = db::DatabaseClient::new(&config).await?;
        Ok(Self::with_database(config, db))
    }

    /// Wires every service on top of an already connected database.
    pub fn with_database(config: AppConfig, db: db::DatabaseClient) -> Self {
        let sentiment_service = Arc::new(services::SentimentService::from_service_url(
            config.sentiment_service_url.as_deref(),
        ));
        Self::with_sentiment(config, db, sentiment_service)
    }

    pub fn with_sentiment(
        config: AppConfig,
        db: db::DatabaseClient,
        sentiment_service: Arc<services::SentimentService>,
    ) -> Self {
        let auth_service = Arc::new(auth::AuthService::new(&config));
        let user_service = Arc::new(services::UserService::new(
            db.user_repo.clone(),
            auth_service.clone(),
        ));
        let post_service = Arc::new(services::PostService::new(
            db.post_repo.clone(),
            sentiment_service.clone(),
        ));
        let follow_service = Arc::new(services::FollowService::new(
            db.user_repo.clone(),
            db.follow_repo.clone(),
        ));

        Self {
            config,
            db,
            auth_service,
            user_service,
            post_service,
            follow_service,
            sentiment_service,
        }
    }
}
