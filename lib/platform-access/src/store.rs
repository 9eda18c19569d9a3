//! User and token persistence.
//!
//! The stores are traits so the auth service can run against in-memory
//! state in tests and single-node deployments, and against a database
//! elsewhere.

use async_trait::async_trait;
use chrono::Utc;
use fieldgate_core::{Result, TokenId, UserId};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::token::{AccessToken, SecretDigest};
use crate::user::User;

/// Persistence for user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a new user. Fails with `Conflict` if the ID is taken.
    async fn insert(&self, user: User) -> Result<(), StoreError>;

    /// Finds a user by ID.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Returns all users.
    async fn list(&self) -> Result<Vec<User>, StoreError>;
}

/// Persistence for access token records.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Inserts a new token. Fails with `Conflict` if the ID is taken.
    async fn insert(&self, token: AccessToken) -> Result<(), StoreError>;

    /// Finds a token by the digest of its secret.
    async fn find_by_digest(
        &self,
        digest: &SecretDigest,
    ) -> Result<Option<AccessToken>, StoreError>;

    /// Revokes a token. Returns false if no such token exists or it was
    /// already revoked.
    async fn revoke(&self, id: TokenId) -> Result<bool, StoreError>;

    /// Counts tokens that can still authenticate.
    async fn count_usable(&self) -> Result<usize, StoreError>;

    /// Deletes expired tokens. Returns how many were deleted.
    async fn delete_expired(&self) -> Result<usize, StoreError>;
}

/// In-memory [`UserStore`].
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, user: User) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id()) {
            return Err(StoreError::Conflict {
                key: user.id().to_string(),
            }
            .into());
        }
        users.insert(user.id(), user);
        Ok(())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by_key(|u| u.id().as_ulid());
        Ok(users)
    }
}

/// In-memory [`TokenStore`].
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    tokens: RwLock<HashMap<TokenId, AccessToken>>,
}

impl InMemoryTokenStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn insert(&self, token: AccessToken) -> Result<(), StoreError> {
        let mut tokens = self.tokens.write().await;
        if tokens.contains_key(&token.id()) {
            return Err(StoreError::Conflict {
                key: token.id().to_string(),
            }
            .into());
        }
        tokens.insert(token.id(), token);
        Ok(())
    }

    async fn find_by_digest(
        &self,
        digest: &SecretDigest,
    ) -> Result<Option<AccessToken>, StoreError> {
        let tokens = self.tokens.read().await;
        Ok(tokens.values().find(|t| t.digest() == digest).cloned())
    }

    async fn revoke(&self, id: TokenId) -> Result<bool, StoreError> {
        let mut tokens = self.tokens.write().await;
        match tokens.get_mut(&id) {
            Some(token) if !token.is_revoked() => {
                token.revoke();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn count_usable(&self) -> Result<usize, StoreError> {
        let tokens = self.tokens.read().await;
        Ok(tokens.values().filter(|t| t.is_usable()).count())
    }

    async fn delete_expired(&self) -> Result<usize, StoreError> {
        let now = Utc::now();
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, t| t.expires_at() > now);
        Ok(before - tokens.len())
    }
}
