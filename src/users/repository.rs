//! In-memory user repository.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;

use super::User;

/// Source of truth for users.
#[derive(Debug, Default)]
pub struct UserRepository {
    users: RwLock<HashMap<u64, User>>,
    next_id: AtomicU64,
}

impl UserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn find(&self, id: u64) -> Option<User> {
        self.users.read().await.get(&id).cloned()
    }

    /// All users ordered by id.
    pub async fn list(&self) -> Vec<User> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by_key(|user| user.id);
        users
    }

    pub async fn insert(&self, name: String, email: String) -> User {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let user = User::new(id, name, email);
        self.users.write().await.insert(id, user.clone());
        user
    }

    /// Applies the given changes; returns `None` if the user does not exist.
    pub async fn update(&self, id: u64, name: Option<String>, email: Option<String>) -> Option<User> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id)?;
        if let Some(name) = name {
            user.name = name;
        }
        if let Some(email) = email {
            user.email = email;
        }
        Some(user.clone())
    }

    /// Returns whether a user was removed.
    pub async fn remove(&self, id: u64) -> bool {
        self.users.write().await.remove(&id).is_some()
    }
}
