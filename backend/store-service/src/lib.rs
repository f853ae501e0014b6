/// Store Service Library
///
/// E-commerce backend exposing products, product reviews, curated product
/// collections and orders over a JSON API backed by PostgreSQL.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers
/// - `models`: Rows, request bodies and response shapes
/// - `services`: Business logic (validation, permissions, transactions)
/// - `db`: Repositories and connection pooling
/// - `filters`: Query-string filters for list endpoints
/// - `middleware`: Bearer token authentication and permission checks
/// - `security`: Password hashing
/// - `error`: Error types and handling
/// - `config`: Configuration management
pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod security;
pub mod services;
pub mod validators;

pub use config::Config;
pub use error::{AppError, Result};
pub use routes::configure_routes;

use sqlx::PgPool;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Lifetime of issued access tokens
    pub token_ttl_secs: i64,
}
