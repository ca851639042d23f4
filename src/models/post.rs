use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::SentimentLabel;
use crate::{AppError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub owner_username: String, // Joined from users on read
    pub content: String,
    pub sentiment: SentimentLabel, // Always derived from the current content
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row shape of `posts JOIN users`.
#[derive(Debug, sqlx::FromRow)]
pub struct PostRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub owner_username: String,
    pub content: String,
    pub sentiment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PostRow> for Post {
    type Error = AppError;

    fn try_from(row: PostRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            owner_id: row.owner_id,
            owner_username: row.owner_username,
            content: row.content,
            sentiment: row.sentiment.parse()?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Body of `POST /posts/` and `PUT /posts/{id}`.
#[derive(Debug, Deserialize)]
pub struct PostContentRequest {
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostOwner {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub content: String,
    pub sentiment: SentimentLabel,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner: PostOwner,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            content: post.content,
            sentiment: post.sentiment,
            created_at: post.created_at,
            updated_at: post.updated_at,
            owner: PostOwner {
                id: post.owner_id,
                username: post.owner_username,
            },
        }
    }
}
