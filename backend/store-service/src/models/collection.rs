use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::Product;

#[derive(Debug, Clone, FromRow)]
pub struct ProductCollection {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct CollectionProductRef {
    pub product_id: i64,
}

/// Body of collection create and replace requests
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CollectionPayload {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub text: String,
    /// Full membership; an empty list clears the collection
    pub products: Vec<CollectionProductRef>,
}

impl CollectionPayload {
    pub fn product_ids(&self) -> Vec<i64> {
        self.products.iter().map(|p| p.product_id).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionResponse {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub products: Vec<Product>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CollectionResponse {
    pub fn new(collection: ProductCollection, products: Vec<Product>) -> Self {
        Self {
            id: collection.id,
            title: collection.title,
            text: collection.text,
            products,
            created_at: collection.created_at,
            updated_at: collection.updated_at,
        }
    }
}
