// Repository trait abstractions for database operations
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{Follow, Post, SentimentLabel, User};
use crate::Result;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `AppError::Conflict` when the username or email is taken.
    async fn create_user(&self, user: &User) -> Result<User>;
    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create_post(&self, post: &Post) -> Result<Post>;
    async fn get_post_by_id(&self, id: Uuid) -> Result<Option<Post>>;
    /// All posts, newest first.
    async fn list_posts(&self) -> Result<Vec<Post>>;
    /// Posts authored by the users `follower_id` follows, newest first.
    async fn get_feed_for_user(&self, follower_id: Uuid) -> Result<Vec<Post>>;
    /// Rewrites content and sentiment of a post owned by `owner_id`.
    /// Returns `None` when no such (id, owner) row exists.
    async fn update_post_content(
        &self,
        id: Uuid,
        owner_id: Uuid,
        content: &str,
        sentiment: SentimentLabel,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Post>>;
    /// Returns whether a row owned by `owner_id` was removed.
    async fn delete_post(&self, id: Uuid, owner_id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Fails with `AppError::Conflict` when the edge already exists.
    async fn create_follow(&self, follow: &Follow) -> Result<Follow>;
    /// Returns whether an edge was removed.
    async fn delete_follow(&self, follower_id: Uuid, followee_id: Uuid) -> Result<bool>;
    async fn follow_exists(&self, follower_id: Uuid, followee_id: Uuid) -> Result<bool>;
}
