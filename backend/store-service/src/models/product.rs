use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Catalogue item as exposed over the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    #[serde(serialize_with = "super::money::serialize")]
    pub price: Decimal,
}

/// Body of product create and replace requests
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct ProductPayload {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1))]
    pub description: String,
    /// Accepts `"5000.00"` as well as `5000.0`
    pub price: Decimal,
}
