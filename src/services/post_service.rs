use crate::db::repository::PostRepository;
use crate::models::post::PostResponse;
use crate::models::Post;
use crate::services::SentimentService;
use crate::{AppError, Result};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

pub const MAX_CONTENT_CHARS: usize = 5000;

pub struct PostService {
    post_repo: Arc<dyn PostRepository>,
    sentiment_service: Arc<SentimentService>,
}

impl PostService {
    pub fn new(post_repo: Arc<dyn PostRepository>, sentiment_service: Arc<SentimentService>) -> Self {
        Self {
            post_repo,
            sentiment_service,
        }
    }

    pub async fn create_post(&self, owner_id: Uuid, content: &str) -> Result<PostResponse> {
        let content = normalize_content(content)?;
        let sentiment = self.sentiment_service.tag(&content).await;
        let now = Utc::now();

        let post = Post {
            id: Uuid::new_v4(),
            owner_id,
            owner_username: String::new(), // filled in by the repository join
            content,
            sentiment,
            created_at: now,
            updated_at: now,
        };

        let created = self.post_repo.create_post(&post).await?;
        tracing::info!("📝 POST: {} created by {} ({})", created.id, created.owner_username, sentiment);
        Ok(PostResponse::from(created))
    }

    pub async fn get_post(&self, post_id: Uuid) -> Result<PostResponse> {
        self.find_post(post_id).await.map(PostResponse::from)
    }

    pub async fn list_posts(&self) -> Result<Vec<PostResponse>> {
        let posts = self.post_repo.list_posts().await?;
        Ok(posts.into_iter().map(PostResponse::from).collect())
    }

    /// Posts by every account `user_id` follows, newest first.
    pub async fn get_feed(&self, user_id: Uuid) -> Result<Vec<PostResponse>> {
        let posts = self.post_repo.get_feed_for_user(user_id).await?;
        Ok(posts.into_iter().map(PostResponse::from).collect())
    }

    pub async fn update_post(&self, caller_id: Uuid, post_id: Uuid, content: &str) -> Result<PostResponse> {
        let existing = self.find_post(post_id).await?;
        ensure_owner(&existing, caller_id)?;
        let content = normalize_content(content)?;

        let sentiment = if content == existing.content {
            existing.sentiment
        } else {
            self.sentiment_service.tag(&content).await
        };

        // Row can vanish between the read and the write
        let updated = self
            .post_repo
            .update_post_content(post_id, caller_id, &content, sentiment, Utc::now())
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

        tracing::info!("📝 POST: {} updated ({})", updated.id, sentiment);
        Ok(PostResponse::from(updated))
    }

    pub async fn delete_post(&self, caller_id: Uuid, post_id: Uuid) -> Result<()> {
        let existing = self.find_post(post_id).await?;
        ensure_owner(&existing, caller_id)?;

        if !self.post_repo.delete_post(post_id, caller_id).await? {
            return Err(AppError::NotFound("Post not found".to_string()));
        }
        tracing::info!("🗑️ POST: {} deleted", post_id);
        Ok(())
    }

    async fn find_post(&self, post_id: Uuid) -> Result<Post> {
        self.post_repo
            .get_post_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))
    }
}

fn ensure_owner(post: &Post, caller_id: Uuid) -> Result<()> {
    if post.owner_id != caller_id {
        return Err(AppError::Forbidden("Not authorized to modify this post".to_string()));
    }
    Ok(())
}

fn normalize_content(content: &str) -> Result<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError("Post content cannot be empty".to_string()));
    }
    if trimmed.chars().count() > MAX_CONTENT_CHARS {
        return Err(AppError::ValidationError(format!(
            "Post content cannot exceed {} characters",
            MAX_CONTENT_CHARS
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryDatabase;
    use crate::db::repository::UserRepository;
    use crate::models::{SentimentLabel, User};

    async fn setup() -> (PostService, MemoryDatabase, User, User) {
        let db = MemoryDatabase::new();
        let mut users = Vec::new();
        for name in ["ana", "luis"] {
            let user = User {
                id: Uuid::new_v4(),
                username: name.to_string(),
                email: format!("{}@example.com", name),
                password_hash: "hash".to_string(),
                is_active: true,
                created_at: Utc::now(),
            };
            users.push(db.create_user(&user).await.unwrap());
        }
        let luis = users.pop().unwrap();
        let ana = users.pop().unwrap();
        let service = PostService::new(Arc::new(db.clone()), Arc::new(SentimentService::new()));
        (service, db, ana, luis)
    }

    #[test]
    fn test_content_normalization() {
        assert_eq!(normalize_content("  hola  ").unwrap(), "hola");
        assert!(matches!(normalize_content("   "), Err(AppError::ValidationError(_))));
        assert!(normalize_content(&"x".repeat(MAX_CONTENT_CHARS)).is_ok());
        assert!(normalize_content(&"x".repeat(MAX_CONTENT_CHARS + 1)).is_err());
    }

    #[tokio::test]
    async fn test_create_tags_sentiment_and_owner() {
        let (posts, _, ana, _) = setup().await;
        let created = posts.create_post(ana.id, "Estoy muy triste").await.unwrap();

        assert_eq!(created.sentiment, SentimentLabel::Negative);
        assert_eq!(created.owner.username, "ana");
        assert_eq!(created.created_at, created.updated_at);
    }

    #[tokio::test]
    async fn test_update_retags_sentiment() {
        let (posts, _, ana, _) = setup().await;
        let created = posts.create_post(ana.id, "El cielo es azul.").await.unwrap();
        assert_eq!(created.sentiment, SentimentLabel::Neutral);

        let updated = posts
            .update_post(ana.id, created.id, "¡Qué día más guay hace hoy!")
            .await
            .unwrap();
        assert_eq!(updated.sentiment, SentimentLabel::Positive);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_missing_post_reported_before_ownership() {
        let (posts, _, ana, luis) = setup().await;
        let created = posts.create_post(ana.id, "mine").await.unwrap();

        assert!(matches!(
            posts.update_post(luis.id, created.id, "hijack").await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            posts.delete_post(luis.id, created.id).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            posts.update_post(luis.id, Uuid::new_v4(), "anything").await,
            Err(AppError::NotFound(_))
        ));

        posts.delete_post(ana.id, created.id).await.unwrap();
        assert!(matches!(
            posts.get_post(created.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_validates_content() {
        let (posts, _, ana, _) = setup().await;
        let created = posts.create_post(ana.id, "first").await.unwrap();
        assert!(matches!(
            posts.update_post(ana.id, created.id, "  ").await,
            Err(AppError::ValidationError(_))
        ));
        assert_eq!(posts.get_post(created.id).await.unwrap().content, "first");
    }
}
