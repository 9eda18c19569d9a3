//! Assembling the server from configuration.

use fieldgate_platform_access::{
    AuthService, BroadcastEventSink, InMemoryTokenStore, InMemoryUserStore, RoleSet, User,
};
use rootcause::Report;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::auth::AppState;
use crate::config::{SeedUser, ServerConfig, TokenConfig};
use crate::error::StartupError;
use crate::graphql::{build_field_gates, create_schema, schema_sdl};

/// Name given to tokens provisioned for seeded accounts.
const SEED_TOKEN_NAME: &str = "seed";

/// Creates an authentication service over in-memory stores.
fn in_memory_auth(token: &TokenConfig, events: &BroadcastEventSink) -> AuthService {
    AuthService::new(
        Arc::new(InMemoryUserStore::new()),
        Arc::new(InMemoryTokenStore::new()),
        Arc::new(events.clone()),
        token.ttl(),
    )
}

/// Registers the configured accounts and provisions their tokens.
pub async fn seed_users(auth: &AuthService, seeds: &[SeedUser]) -> Result<(), Report<StartupError>> {
    for seed in seeds {
        let failed = |e: &dyn std::fmt::Display| StartupError::Seed {
            email: seed.email.clone(),
            details: e.to_string(),
        };

        let user = User::new(&seed.name, &seed.email)
            .with_roles(RoleSet::from_names(seed.roles.iter().map(String::as_str)));
        let user_id = user.id();
        auth.register_user(user).await.map_err(|e| failed(&e))?;

        if let Some(secret) = &seed.token {
            auth.issue_token_with_secret(user_id, SEED_TOKEN_NAME, secret.clone())
                .await
                .map_err(|e| failed(&e))?;
        }
        debug!(user_id = %user_id, email = %seed.email, "seeded user");
    }
    Ok(())
}

/// Validates the configuration, binds the field gates, and builds the
/// shared state over in-memory stores publishing to `events`.
///
/// # Errors
///
/// Fails on unusable token settings, and if any gate is misconfigured; the
/// server must not start with an unprotected field.
pub fn build_state(
    config: &ServerConfig,
    events: &BroadcastEventSink,
) -> Result<Arc<AppState>, Report<StartupError>> {
    config.token.validate()?;
    let auth = in_memory_auth(&config.token, events);

    let gates = build_field_gates(&config.gates).map_err(|e| StartupError::Gates {
        details: e.to_string(),
    })?;
    info!(gated_fields = gates.len(), "field gates bound");

    let schema = create_schema();
    debug!(sdl = %schema_sdl(&schema), "schema built");

    Ok(Arc::new(AppState::new(auth, gates, schema)))
}

/// Spawns the periodic expired-token purge.
///
/// `interval_secs` must be non-zero; [`build_state`] rejects zero.
pub fn spawn_token_cleanup(auth: AuthService, interval_secs: u64) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
        loop {
            interval.tick().await;
            match auth.purge_expired_tokens().await {
                Ok(count) if count > 0 => {
                    debug!(deleted_tokens = count, "Periodic token cleanup");
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "Failed to cleanup expired tokens");
                }
            }
        }
    })
}
