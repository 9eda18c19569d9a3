//! Shared harness for driving the router in-process.

#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use fieldgate_platform_access::{AuthService, BroadcastEventSink, IssuedToken, RoleSet, User};
use fieldgate_server::{app, config::ServerConfig, startup};
use serde_json::{Value, json};
use tower::ServiceExt;

pub struct TestServer {
    pub auth: AuthService,
    pub events: BroadcastEventSink,
    router: Router,
}

impl TestServer {
    pub fn new() -> Self {
        let config: ServerConfig = serde_json::from_value(json!({})).expect("default config");
        Self::with_config(config)
    }

    pub fn with_config(config: ServerConfig) -> Self {
        let events = BroadcastEventSink::default();
        let state = startup::build_state(&config, &events).expect("valid config");
        Self {
            auth: state.auth.clone(),
            events,
            router: app::router(state),
        }
    }

    /// Registers a user with `roles` and issues them a token.
    pub async fn user_with_token(&self, name: &str, roles: &[&str]) -> (User, IssuedToken) {
        let user = User::new(name, format!("{}@example.com", name.to_lowercase()))
            .with_roles(RoleSet::from_names(roles.iter().copied()));
        self.auth.register_user(user.clone()).await.expect("register");
        let issued = self
            .auth
            .issue_token(user.id(), "test Token")
            .await
            .expect("issue token");
        (user, issued)
    }

    /// Posts a GraphQL query, returning the status and decoded body.
    pub async fn graphql(&self, query: &str, secret: Option<&str>) -> (StatusCode, Value) {
        let mut request = Request::post("/graphql").header(header::CONTENT_TYPE, "application/json");
        if let Some(secret) = secret {
            request = request.header(header::AUTHORIZATION, format!("Bearer {secret}"));
        }
        let body = json!({ "query": query }).to_string();
        let response = self
            .router
            .clone()
            .oneshot(request.body(Body::from(body)).expect("request"))
            .await
            .expect("router is infallible");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    pub async fn get(&self, uri: &str) -> StatusCode {
        self.router
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
            .await
            .expect("router is infallible")
            .status()
    }
}
