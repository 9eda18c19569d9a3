//! Personal access tokens.
//!
//! A token is issued to a user and presented as a bearer secret on every
//! request. Only a SHA-256 digest of the secret is stored; the secret itself
//! is returned once, from [`AuthService::issue_token`].
//!
//! [`AuthService::issue_token`]: crate::service::AuthService::issue_token

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use fieldgate_core::{TokenId, UserId};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Digest of a bearer secret, as stored and looked up.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretDigest(String);

impl SecretDigest {
    /// Computes the digest of a bearer secret.
    #[must_use]
    pub fn of(secret: &str) -> Self {
        let digest = Sha256::digest(secret.as_bytes());
        Self(URL_SAFE_NO_PAD.encode(digest))
    }

    /// Returns the encoded digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Generates a fresh bearer secret.
///
/// Two ULIDs give 160 random bits plus a millisecond timestamp.
#[must_use]
pub fn generate_secret() -> String {
    let mut bytes = [0u8; 32];
    bytes[..16].copy_from_slice(&ulid::Ulid::new().to_bytes());
    bytes[16..].copy_from_slice(&ulid::Ulid::new().to_bytes());
    URL_SAFE_NO_PAD.encode(bytes)
}

/// An issued access token record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    /// Unique identifier for this token.
    id: TokenId,
    /// The user the token was issued to.
    user_id: UserId,
    /// Human-readable label chosen at issue time.
    name: String,
    /// Digest of the bearer secret.
    digest: SecretDigest,
    /// When the token was issued.
    created_at: DateTime<Utc>,
    /// When the token stops authenticating.
    expires_at: DateTime<Utc>,
    /// Set once the token is revoked (for example on logout).
    revoked: bool,
}

impl AccessToken {
    /// Creates a token record for a secret, valid for `ttl`.
    #[must_use]
    pub fn new(user_id: UserId, name: impl Into<String>, secret: &str, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: TokenId::new(),
            user_id,
            name: name.into(),
            digest: SecretDigest::of(secret),
            created_at: now,
            expires_at: now + ttl,
            revoked: false,
        }
    }

    /// Returns the token ID.
    #[must_use]
    pub fn id(&self) -> TokenId {
        self.id
    }

    /// Returns the owning user's ID.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the token label.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the stored secret digest.
    #[must_use]
    pub fn digest(&self) -> &SecretDigest {
        &self.digest
    }

    /// Returns when the token was issued.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the token expires.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns true if the token has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Returns true if the token was revoked.
    #[must_use]
    pub fn is_revoked(&self) -> bool {
        self.revoked
    }

    /// Returns true if the token may still authenticate requests.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        !self.revoked && !self.is_expired()
    }

    /// Marks the token revoked. Revocation is permanent.
    pub fn revoke(&mut self) {
        self.revoked = true;
    }
}

/// A newly issued token together with its bearer secret.
///
/// The secret is not recoverable from the stored record.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// The stored token record.
    pub token: AccessToken,
    /// The bearer secret to hand to the client.
    pub secret: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_stable_and_hides_secret() {
        let a = SecretDigest::of("s3cret");
        let b = SecretDigest::of("s3cret");
        assert_eq!(a, b);
        assert_ne!(a.as_str(), "s3cret");
        assert_ne!(a, SecretDigest::of("other"));
    }

    #[test]
    fn generated_secrets_differ() {
        let first = generate_secret();
        let second = generate_secret();
        assert_ne!(first, second);
        // 32 bytes, unpadded base64
        assert_eq!(first.len(), 43);
    }

    #[test]
    fn new_token_is_usable() {
        let user_id = UserId::new();
        let token = AccessToken::new(user_id, "cli", "secret", Duration::hours(1));

        assert_eq!(token.user_id(), user_id);
        assert_eq!(token.name(), "cli");
        assert_eq!(token.digest(), &SecretDigest::of("secret"));
        assert!(token.expires_at() > token.created_at());
        assert!(!token.is_expired());
        assert!(!token.is_revoked());
        assert!(token.is_usable());
    }

    #[test]
    fn expired_token_is_not_usable() {
        let token = AccessToken::new(UserId::new(), "cli", "secret", Duration::seconds(-1));
        assert!(token.is_expired());
        assert!(!token.is_usable());
    }

    #[test]
    fn revoked_token_is_not_usable() {
        let mut token = AccessToken::new(UserId::new(), "cli", "secret", Duration::hours(1));
        token.revoke();
        assert!(token.is_revoked());
        assert!(!token.is_usable());
    }
}
