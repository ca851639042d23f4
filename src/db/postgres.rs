// PostgreSQL repository implementations using sqlx
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::migrate::Migrator;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::db::repository::{FollowRepository, PostRepository, UserRepository};
use crate::models::post::PostRow;
use crate::models::{Follow, Post, SentimentLabel, User};
use crate::{AppError, Result};

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

// Column list shared by every post read; expects `p` = posts, `u` = users
const POST_COLUMNS: &str = "p.id, p.owner_id, u.username AS owner_username, p.content, \
                            p.sentiment, p.created_at, p.updated_at";

// Equal timestamps fall back to insertion order via the `seq` column
const NEWEST_FIRST: &str = "p.created_at DESC, p.seq DESC";

// PostgreSQL connection pool wrapper
pub struct PostgresDatabase {
    pub pool: Arc<PgPool>,
}

impl PostgresDatabase {
    pub async fn new(database_url: &str) -> Result<Self> {
        tracing::info!("🔗 DATABASE: Configuring connection pool");
        tracing::info!("   📊 Max connections: 20");
        tracing::info!("   ⏰ Acquire timeout: 30s");

        let pool = PgPoolOptions::new()
            .max_connections(20)
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(3600))
            .acquire_timeout(Duration::from_secs(30))
            .connect(database_url)
            .await
            .map_err(|e| {
                tracing::error!("❌ DATABASE: Failed to create connection pool: {}", e);
                AppError::DatabaseError(format!("Failed to connect to PostgreSQL: {}", e))
            })?;

        tracing::info!("✅ DATABASE: Connection pool configured successfully");

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    pub async fn run_migrations(&self) -> Result<()> {
        MIGRATOR
            .run(&*self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to run migrations: {}", e)))?;
        tracing::info!("✅ DATABASE: Schema migrations applied");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&*self.pool).await?;
        Ok(())
    }

    pub fn user_repo(&self) -> PostgresUserRepository {
        PostgresUserRepository { pool: self.pool.clone() }
    }

    pub fn post_repo(&self) -> PostgresPostRepository {
        PostgresPostRepository { pool: self.pool.clone() }
    }

    pub fn follow_repo(&self) -> PostgresFollowRepository {
        PostgresFollowRepository { pool: self.pool.clone() }
    }
}

// PostgreSQL User Repository
pub struct PostgresUserRepository {
    pool: Arc<PgPool>,
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create_user(&self, user: &User) -> Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, email, password_hash, is_active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, username, email, password_hash, is_active, created_at
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_active)
        .bind(user.created_at)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                match db_err.constraint() {
                    Some("users_email_key") => {
                        AppError::Conflict("Email is already registered".to_string())
                    }
                    _ => AppError::Conflict("Username is already taken".to_string()),
                }
            }
            _ => AppError::DatabaseError(format!("Failed to create user: {}", e)),
        })
    }

    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, is_active, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to get user by id: {}", e)))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, is_active, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to get user by username: {}", e)))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, is_active, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to get user by email: {}", e)))
    }
}

// PostgreSQL Post Repository
pub struct PostgresPostRepository {
    pool: Arc<PgPool>,
}

impl PostgresPostRepository {
    fn into_posts(rows: Vec<PostRow>) -> Result<Vec<Post>> {
        rows.into_iter().map(Post::try_from).collect()
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create_post(&self, post: &Post) -> Result<Post> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            WITH p AS (
                INSERT INTO posts (id, owner_id, content, sentiment, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
            )
            SELECT {POST_COLUMNS} FROM p JOIN users u ON u.id = p.owner_id
            "#
        ))
        .bind(post.id)
        .bind(post.owner_id)
        .bind(&post.content)
        .bind(post.sentiment.as_str())
        .bind(post.created_at)
        .bind(post.updated_at)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to create post: {}", e)))?;

        Post::try_from(row)
    }

    async fn get_post_by_id(&self, id: Uuid) -> Result<Option<Post>> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts p JOIN users u ON u.id = p.owner_id WHERE p.id = $1"
        ))
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to get post: {}", e)))?;

        row.map(Post::try_from).transpose()
    }

    async fn list_posts(&self) -> Result<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts p
            JOIN users u ON u.id = p.owner_id
            ORDER BY {NEWEST_FIRST}
            "#
        ))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to list posts: {}", e)))?;

        Self::into_posts(rows)
    }

    async fn get_feed_for_user(&self, follower_id: Uuid) -> Result<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts p
            JOIN users u ON u.id = p.owner_id
            JOIN follows f ON f.followee_id = p.owner_id
            WHERE f.follower_id = $1
            ORDER BY {NEWEST_FIRST}
            "#
        ))
        .bind(follower_id)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to get feed: {}", e)))?;

        Self::into_posts(rows)
    }

    async fn update_post_content(
        &self,
        id: Uuid,
        owner_id: Uuid,
        content: &str,
        sentiment: SentimentLabel,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Post>> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            r#"
            WITH p AS (
                UPDATE posts
                SET content = $3, sentiment = $4, updated_at = $5
                WHERE id = $1 AND owner_id = $2
                RETURNING *
            )
            SELECT {POST_COLUMNS} FROM p JOIN users u ON u.id = p.owner_id
            "#
        ))
        .bind(id)
        .bind(owner_id)
        .bind(content)
        .bind(sentiment.as_str())
        .bind(updated_at)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to update post: {}", e)))?;

        row.map(Post::try_from).transpose()
    }

    async fn delete_post(&self, id: Uuid, owner_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&*self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to delete post: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}

// PostgreSQL Follow Repository
pub struct PostgresFollowRepository {
    pool: Arc<PgPool>,
}

#[async_trait]
impl FollowRepository for PostgresFollowRepository {
    async fn create_follow(&self, follow: &Follow) -> Result<Follow> {
        sqlx::query_as::<_, Follow>(
            r#"
            INSERT INTO follows (follower_id, followee_id, created_at)
            VALUES ($1, $2, $3)
            RETURNING follower_id, followee_id, created_at
            "#,
        )
        .bind(follow.follower_id)
        .bind(follow.followee_id)
        .bind(follow.created_at)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::Conflict("Already following this user".to_string())
            }
            _ => AppError::DatabaseError(format!("Failed to create follow: {}", e)),
        })
    }

    async fn delete_follow(&self, follower_id: Uuid, followee_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND followee_id = $2")
            .bind(follower_id)
            .bind(followee_id)
            .execute(&*self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to delete follow: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn follow_exists(&self, follower_id: Uuid, followee_id: Uuid) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM follows WHERE follower_id = $1 AND followee_id = $2)",
        )
        .bind(follower_id)
        .bind(followee_id)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to check follow: {}", e)))?;

        Ok(exists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_first_breaks_ties_by_insertion_sequence() {
        assert!(NEWEST_FIRST.ends_with("p.seq DESC"));
        assert!(!NEWEST_FIRST.contains("p.id"));
    }

    #[test]
    fn test_migrations_add_post_sequence() {
        let sequence = MIGRATOR
            .iter()
            .find(|migration| migration.sql.contains("seq BIGSERIAL"))
            .expect("no migration adds posts.seq");
        assert!(sequence.sql.contains("ALTER TABLE posts"));
        assert!(sequence.version > 20240101000000);
    }
}
