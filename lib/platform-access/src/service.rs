//! Token issue, authentication, and logout.
//!
//! `AuthService` ties the user store, token store, and event sink together.
//! It is the collaborator that builds a [`Caller`] for each request; field
//! gates only ever read that caller.

use chrono::Duration;
use fieldgate_core::UserId;
use rootcause::Report;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::caller::Caller;
use crate::error::{AuthenticationError, StoreError};
use crate::event::{AuthEvent, EventSink};
use crate::store::{TokenStore, UserStore};
use crate::token::{AccessToken, IssuedToken, SecretDigest, generate_secret};
use crate::user::User;

/// Status reported by a successful logout.
pub const LOGOUT_STATUS: &str = "TOKEN_REVOKED";

/// Message reported by a successful logout.
pub const LOGOUT_MESSAGE: &str = "Your session has been terminated";

/// Result of a successful logout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoutOutcome {
    /// Machine-readable status.
    pub status: String,
    /// Human-readable message.
    pub message: String,
}

impl LogoutOutcome {
    fn revoked() -> Self {
        Self {
            status: LOGOUT_STATUS.to_string(),
            message: LOGOUT_MESSAGE.to_string(),
        }
    }
}

fn store_failure(err: Report<StoreError>) -> Report<AuthenticationError> {
    AuthenticationError::from(err.current_context().clone()).into()
}

/// Authentication service over pluggable stores.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: Arc<dyn TokenStore>,
    events: Arc<dyn EventSink>,
    token_ttl: Duration,
}

impl AuthService {
    /// Creates a service issuing tokens valid for `token_ttl`.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserStore>,
        tokens: Arc<dyn TokenStore>,
        events: Arc<dyn EventSink>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            users,
            tokens,
            events,
            token_ttl,
        }
    }

    /// Registers a new user.
    #[instrument(skip(self, user), fields(user_id = %user.id()))]
    pub async fn register_user(&self, user: User) -> Result<(), Report<AuthenticationError>> {
        self.users.insert(user).await.map_err(store_failure)?;
        debug!("user registered");
        Ok(())
    }

    /// Looks up a user by ID.
    pub async fn find_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<User>, Report<AuthenticationError>> {
        self.users.find_by_id(user_id).await.map_err(store_failure)
    }

    /// Lists all registered users.
    pub async fn list_users(&self) -> Result<Vec<User>, Report<AuthenticationError>> {
        self.users.list().await.map_err(store_failure)
    }

    /// Counts tokens that can still authenticate.
    pub async fn count_usable_tokens(&self) -> Result<usize, Report<AuthenticationError>> {
        self.tokens.count_usable().await.map_err(store_failure)
    }

    /// Issues a new access token for a registered user.
    ///
    /// The returned secret is the only copy; the store keeps its digest.
    pub async fn issue_token(
        &self,
        user_id: UserId,
        name: &str,
    ) -> Result<IssuedToken, Report<AuthenticationError>> {
        self.issue_token_with_secret(user_id, name, generate_secret()).await
    }

    /// Issues an access token for a secret chosen by the caller.
    ///
    /// Used to provision known credentials, such as seeded accounts.
    #[instrument(skip(self, name, secret))]
    pub async fn issue_token_with_secret(
        &self,
        user_id: UserId,
        name: &str,
        secret: String,
    ) -> Result<IssuedToken, Report<AuthenticationError>> {
        if self.find_user(user_id).await?.is_none() {
            return Err(AuthenticationError::UserNotFound { user_id }.into());
        }

        let token = AccessToken::new(user_id, name, &secret, self.token_ttl);
        self.tokens.insert(token.clone()).await.map_err(store_failure)?;

        self.events
            .publish(AuthEvent::TokenIssued {
                user_id,
                token_id: token.id(),
            })
            .await;
        info!(token_id = %token.id(), "access token issued");

        Ok(IssuedToken { token, secret })
    }

    /// Resolves a bearer secret to the request's caller.
    ///
    /// Unknown, revoked, and expired tokens, and tokens whose user no longer
    /// exists, all yield `None`. Only store failures are errors.
    #[instrument(skip_all)]
    pub async fn authenticate(
        &self,
        secret: &str,
    ) -> Result<Option<Caller>, Report<AuthenticationError>> {
        let digest = SecretDigest::of(secret);
        let token = self.tokens.find_by_digest(&digest).await.map_err(store_failure)?;

        let Some(token) = token else {
            debug!("unknown token");
            return Ok(None);
        };
        if !token.is_usable() {
            debug!(
                token_id = %token.id(),
                revoked = token.is_revoked(),
                "token no longer usable"
            );
            return Ok(None);
        }

        let Some(user) = self.find_user(token.user_id()).await? else {
            debug!(token_id = %token.id(), "token owner missing");
            return Ok(None);
        };

        Ok(Some(Caller::for_user(&user).with_token(token.id())))
    }

    /// Logs the caller out by revoking the token the request used.
    ///
    /// Emits [`AuthEvent::UserLoggedOut`] once the token is revoked. A token
    /// that is unknown or already revoked fails with `TokenNotFound`, so
    /// concurrent logouts with one token succeed at most once.
    #[instrument(skip(self, caller), fields(user_id = %caller.user_id()))]
    pub async fn logout(&self, caller: &Caller) -> Result<LogoutOutcome, Report<AuthenticationError>> {
        let token_id = caller
            .token_id()
            .ok_or(AuthenticationError::NotAuthenticated)?;

        let user = self
            .find_user(caller.user_id())
            .await?
            .ok_or(AuthenticationError::UserNotFound {
                user_id: caller.user_id(),
            })?;

        let revoked = self.tokens.revoke(token_id).await.map_err(store_failure)?;
        if !revoked {
            return Err(AuthenticationError::TokenNotFound { token_id }.into());
        }

        self.events.publish(AuthEvent::UserLoggedOut { user }).await;
        info!(token_id = %token_id, "user logged out");

        Ok(LogoutOutcome::revoked())
    }

    /// Deletes expired tokens from the store.
    pub async fn purge_expired_tokens(&self) -> Result<usize, Report<AuthenticationError>> {
        self.tokens.delete_expired().await.map_err(store_failure)
    }
}
