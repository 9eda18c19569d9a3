//! fieldgate GraphQL server.
//!
//! Serves a juniper schema over axum in which selected fields are gated by
//! `@canAccess(requiredRole: ...)`. Callers authenticate with bearer access
//! tokens; gated fields resolve to null for callers without the role.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod graphql;
pub mod startup;
