//! Authentication extractors for Axum.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use fieldgate_platform_access::Caller;
use std::sync::Arc;
use tracing::error;

use super::AppState;

/// Authorization scheme for access tokens.
const BEARER_SCHEME: &str = "bearer";

/// Extractor for the request's caller.
///
/// `None` for anonymous requests and for tokens that no longer authenticate.
pub struct BearerCaller(pub Option<Caller>);

/// Returns the secret from an `Authorization: Bearer <secret>` header value.
fn bearer_secret(value: &str) -> Option<&str> {
    let (scheme, secret) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return None;
    }
    let secret = secret.trim();
    (!secret.is_empty()).then_some(secret)
}

impl<S> FromRequestParts<S> for BearerCaller
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = Arc::<AppState>::from_ref(state);

        let Some(secret) = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_secret)
        else {
            return Ok(BearerCaller(None));
        };

        let caller = app_state.auth.authenticate(secret).await.map_err(|e| {
            error!(error = %e, "failed to authenticate bearer token");
            AuthRejection::InternalError
        })?;

        Ok(BearerCaller(caller))
    }
}

/// Rejection type for authentication extractors.
#[derive(Debug)]
pub enum AuthRejection {
    InternalError,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bearer_secret() {
        assert_eq!(bearer_secret("Bearer abc123"), Some("abc123"));
        assert_eq!(bearer_secret("bearer abc123"), Some("abc123"));
        assert_eq!(bearer_secret("  BEARER   abc123  "), Some("abc123"));
    }

    #[test]
    fn rejects_other_schemes_and_empty_secrets() {
        assert_eq!(bearer_secret("Basic dXNlcjpwYXNz"), None);
        assert_eq!(bearer_secret("Bearer"), None);
        assert_eq!(bearer_secret("Bearer   "), None);
        assert_eq!(bearer_secret(""), None);
    }
}
