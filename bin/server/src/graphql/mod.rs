//! GraphQL API.
//!
//! Protected fields resolve through the gates bound by
//! [`build_field_gates`]; every other field is open.

mod context;
mod schema;

pub use context::GraphQLContext;
pub use schema::{
    AdminReport, LogoutResponse, Mutation, Query, Schema, Viewer, build_field_gates,
    create_schema, protected_fields, schema_sdl,
};
