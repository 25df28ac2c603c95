//! REST client for the academy's hosted database.
//!
//! The database is exposed through PostgREST: every table is a resource
//! under `/rest/v1/`, authenticated with the project's API key sent both as
//! the `apikey` header and as a bearer token.

pub mod client;
pub mod error;
pub mod rows;

pub use client::ApiClient;
pub use error::ApiError;
