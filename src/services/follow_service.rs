use crate::db::repository::{FollowRepository, UserRepository};
use crate::models::follow::FollowResponse;
use crate::models::{Follow, User};
use crate::{AppError, Result};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

pub struct FollowService {
    user_repo: Arc<dyn UserRepository>,
    follow_repo: Arc<dyn FollowRepository>,
}

impl FollowService {
    pub fn new(user_repo: Arc<dyn UserRepository>, follow_repo: Arc<dyn FollowRepository>) -> Self {
        Self {
            user_repo,
            follow_repo,
        }
    }

    pub async fn follow(&self, follower_id: Uuid, followee_username: &str) -> Result<FollowResponse> {
        let follower = self.user_by_id(follower_id).await?;
        let followee = self.user_by_username(followee_username).await?;

        if follower.id == followee.id {
            return Err(AppError::ValidationError("You cannot follow yourself".to_string()));
        }

        // The store constraint still catches a concurrent duplicate
        if self.follow_repo.follow_exists(follower.id, followee.id).await? {
            return Err(AppError::Conflict(format!(
                "Already following '{}'",
                followee.username
            )));
        }

        let follow = Follow {
            follower_id: follower.id,
            followee_id: followee.id,
            created_at: Utc::now(),
        };
        let created = self.follow_repo.create_follow(&follow).await?;

        tracing::info!("🤝 FOLLOW: {} -> {}", follower.username, followee.username);
        Ok(FollowResponse {
            follower: follower.username,
            followee: followee.username,
            created_at: created.created_at,
        })
    }

    pub async fn unfollow(&self, follower_id: Uuid, followee_username: &str) -> Result<()> {
        let followee = self.user_by_username(followee_username).await?;

        if !self.follow_repo.delete_follow(follower_id, followee.id).await? {
            return Err(AppError::NotFound(format!(
                "You are not following '{}'",
                followee.username
            )));
        }

        tracing::info!("🤝 UNFOLLOW: {} no longer followed", followee.username);
        Ok(())
    }

    async fn user_by_id(&self, id: Uuid) -> Result<User> {
        self.user_repo
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    async fn user_by_username(&self, username: &str) -> Result<User> {
        self.user_repo
            .get_user_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User '{}' not found", username)))
    }
}
