//! User service
//!
//! Reads go through the cache with `get_or_set`; every write invalidates the
//! keys it affects. The service only sees the `CacheStore` contract, so it
//! behaves the same whichever store is wired in, and an unavailable cache
//! only costs repository round trips.

use std::sync::Arc;

use tracing::debug;

use super::{User, UserRepository};
use crate::cache::{CacheStore, CacheStoreExt};
use crate::error::{AppError, Result};

const USER_LIST_KEY: &str = "users:all";

fn user_key(id: u64) -> String {
    format!("user:{}", id)
}

fn not_found(id: u64) -> AppError {
    AppError::NotFound(format!("User {} not found", id))
}

/// User operations backed by a repository and memoized in a cache.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<UserRepository>,
    cache: Arc<dyn CacheStore>,
}

impl UserService {
    pub fn new(repo: Arc<UserRepository>, cache: Arc<dyn CacheStore>) -> Self {
        Self { repo, cache }
    }

    /// The cache this service reads through.
    pub fn cache(&self) -> &Arc<dyn CacheStore> {
        &self.cache
    }

    pub async fn get_user(&self, id: u64) -> Result<User> {
        let repo = &self.repo;
        self.cache
            .get_or_set(
                &user_key(id),
                move || async move { repo.find(id).await.ok_or_else(|| not_found(id)) },
                None,
            )
            .await
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        let repo = &self.repo;
        self.cache
            .get_or_set(
                USER_LIST_KEY,
                move || async move { Ok(repo.list().await) },
                None,
            )
            .await
    }

    pub async fn create_user(&self, name: String, email: String) -> Result<User> {
        let user = self.repo.insert(name, email).await;
        self.invalidate(&[USER_LIST_KEY]).await;
        Ok(user)
    }

    pub async fn update_user(
        &self,
        id: u64,
        name: Option<String>,
        email: Option<String>,
    ) -> Result<User> {
        let user = self
            .repo
            .update(id, name, email)
            .await
            .ok_or_else(|| not_found(id))?;
        let key = user_key(id);
        self.invalidate(&[key.as_str(), USER_LIST_KEY]).await;
        Ok(user)
    }

    pub async fn delete_user(&self, id: u64) -> Result<()> {
        if !self.repo.remove(id).await {
            return Err(not_found(id));
        }
        let key = user_key(id);
        self.invalidate(&[key.as_str(), USER_LIST_KEY]).await;
        Ok(())
    }

    /// Drops every cached entry.
    pub async fn flush_cache(&self) {
        self.cache.flush().await;
    }

    async fn invalidate(&self, keys: &[&str]) {
        for key in keys {
            if !self.cache.delete(key).await {
                debug!(key, "Cache invalidation skipped");
            }
        }
    }
}
