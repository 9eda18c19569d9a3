//! Core identifiers and error handling for fieldgate.
//!
//! This crate provides the foundational types shared by the platform-access
//! collaborators, the access gate, and the GraphQL server.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{TokenId, UserId};
