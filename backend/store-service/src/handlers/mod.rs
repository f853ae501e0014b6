/// HTTP handlers, one module per resource
pub mod auth;
pub mod collections;
pub mod health;
pub mod orders;
pub mod products;
pub mod reviews;

pub use health::{health_check, liveness_check, readiness_check};
