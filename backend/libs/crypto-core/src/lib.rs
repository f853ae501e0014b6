//! Shared token primitives for store services.
//!
//! - `jwt`: RS256 access token issuing and validation

pub mod jwt;
