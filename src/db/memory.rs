// In-memory repository implementations for local runs and tests
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::db::repository::{FollowRepository, PostRepository, UserRepository};
use crate::models::{Follow, Post, SentimentLabel, User};
use crate::{AppError, Result};

#[derive(Default)]
struct MemoryState {
    users: HashMap<Uuid, User>,
    posts: HashMap<Uuid, StoredPost>,
    follows: HashMap<(Uuid, Uuid), Follow>,
    next_sequence: u64,
}

// Username is resolved from `users` on read, as in the SQL join
#[derive(Clone)]
struct StoredPost {
    id: Uuid,
    owner_id: Uuid,
    content: String,
    sentiment: SentimentLabel,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    sequence: u64, // insertion order, breaks created_at ties
}

/// One shared store implementing every repository trait, so feed queries can
/// see follow edges the same way the SQL join does.
#[derive(Clone, Default)]
pub struct MemoryDatabase {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryState>> {
        self.state
            .read()
            .map_err(|_| AppError::InternalError("In-memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryState>> {
        self.state
            .write()
            .map_err(|_| AppError::InternalError("In-memory store lock poisoned".to_string()))
    }
}

impl MemoryState {
    fn hydrate(&self, stored: &StoredPost) -> Result<Post> {
        let owner = self.users.get(&stored.owner_id).ok_or_else(|| {
            AppError::InternalError(format!("Post {} has no owner row", stored.id))
        })?;
        Ok(Post {
            id: stored.id,
            owner_id: stored.owner_id,
            owner_username: owner.username.clone(),
            content: stored.content.clone(),
            sentiment: stored.sentiment,
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        })
    }

    fn newest_first<'a, I>(&self, posts: I) -> Result<Vec<Post>>
    where
        I: Iterator<Item = &'a StoredPost>,
    {
        let mut selected: Vec<&StoredPost> = posts.collect();
        selected.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.sequence.cmp(&a.sequence))
        });
        selected.into_iter().map(|p| self.hydrate(p)).collect()
    }
}

#[async_trait]
impl UserRepository for MemoryDatabase {
    async fn create_user(&self, user: &User) -> Result<User> {
        let mut state = self.write()?;

        if state.users.values().any(|u| u.username == user.username) {
            return Err(AppError::Conflict("Username is already taken".to_string()));
        }
        if state.users.values().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("Email is already registered".to_string()));
        }

        state.users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self.read()?.users.values().find(|u| u.username == username).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.read()?.users.values().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl PostRepository for MemoryDatabase {
    async fn create_post(&self, post: &Post) -> Result<Post> {
        let mut state = self.write()?;

        if !state.users.contains_key(&post.owner_id) {
            return Err(AppError::NotFound("Post owner not found".to_string()));
        }

        state.next_sequence += 1;
        let stored = StoredPost {
            id: post.id,
            owner_id: post.owner_id,
            content: post.content.clone(),
            sentiment: post.sentiment,
            created_at: post.created_at,
            updated_at: post.updated_at,
            sequence: state.next_sequence,
        };
        let created = state.hydrate(&stored)?;
        state.posts.insert(stored.id, stored);
        Ok(created)
    }

    async fn get_post_by_id(&self, id: Uuid) -> Result<Option<Post>> {
        let state = self.read()?;
        state.posts.get(&id).map(|p| state.hydrate(p)).transpose()
    }

    async fn list_posts(&self) -> Result<Vec<Post>> {
        let state = self.read()?;
        state.newest_first(state.posts.values())
    }

    async fn get_feed_for_user(&self, follower_id: Uuid) -> Result<Vec<Post>> {
        let state = self.read()?;
        let followees: HashSet<Uuid> = state
            .follows
            .keys()
            .filter(|(follower, _)| *follower == follower_id)
            .map(|(_, followee)| *followee)
            .collect();

        state.newest_first(state.posts.values().filter(|p| followees.contains(&p.owner_id)))
    }

    async fn update_post_content(
        &self,
        id: Uuid,
        owner_id: Uuid,
        content: &str,
        sentiment: SentimentLabel,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Post>> {
        let mut state = self.write()?;

        let updated = match state.posts.get_mut(&id) {
            Some(stored) if stored.owner_id == owner_id => {
                stored.content = content.to_string();
                stored.sentiment = sentiment;
                stored.updated_at = updated_at;
                stored.clone()
            }
            _ => return Ok(None),
        };
        state.hydrate(&updated).map(Some)
    }

    async fn delete_post(&self, id: Uuid, owner_id: Uuid) -> Result<bool> {
        let mut state = self.write()?;

        let owned = state
            .posts
            .get(&id)
            .map(|stored| stored.owner_id == owner_id)
            .unwrap_or(false);
        if owned {
            state.posts.remove(&id);
        }
        Ok(owned)
    }
}

#[async_trait]
impl FollowRepository for MemoryDatabase {
    async fn create_follow(&self, follow: &Follow) -> Result<Follow> {
        let mut state = self.write()?;
        let key = (follow.follower_id, follow.followee_id);

        if state.follows.contains_key(&key) {
            return Err(AppError::Conflict("Already following this user".to_string()));
        }

        state.follows.insert(key, follow.clone());
        Ok(follow.clone())
    }

    async fn delete_follow(&self, follower_id: Uuid, followee_id: Uuid) -> Result<bool> {
        Ok(self.write()?.follows.remove(&(follower_id, followee_id)).is_some())
    }

    async fn follow_exists(&self, follower_id: Uuid, followee_id: Uuid) -> Result<bool> {
        Ok(self.read()?.follows.contains_key(&(follower_id, followee_id)))
    }
}
