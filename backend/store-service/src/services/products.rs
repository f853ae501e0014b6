/// Product catalogue
use crate::db::product_repo;
use crate::error::{AppError, Result};
use crate::filters::ProductFilter;
use crate::models::{Product, ProductPayload};
use crate::validators::check_money;
use sqlx::PgPool;
use validator::Validate;

pub struct ProductService {
    pool: PgPool,
}

impl ProductService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>> {
        Ok(product_repo::list_products(&self.pool, filter).await?)
    }

    pub async fn get(&self, product_id: i64) -> Result<Product> {
        product_repo::find_product(&self.pool, product_id)
            .await?
            .ok_or_else(|| not_found(product_id))
    }

    pub async fn create(&self, payload: &ProductPayload) -> Result<Product> {
        validate_payload(payload)?;

        let product = product_repo::create_product(
            &self.pool,
            &payload.name,
            &payload.description,
            payload.price,
        )
        .await?;

        tracing::info!(product_id = product.id, "product created");
        Ok(product)
    }

    pub async fn update(&self, product_id: i64, payload: &ProductPayload) -> Result<Product> {
        // 404 wins over a malformed body
        self.get(product_id).await?;
        validate_payload(payload)?;

        product_repo::update_product(
            &self.pool,
            product_id,
            &payload.name,
            &payload.description,
            payload.price,
        )
        .await?
        .ok_or_else(|| not_found(product_id))
    }

    pub async fn delete(&self, product_id: i64) -> Result<()> {
        if !product_repo::delete_product(&self.pool, product_id).await? {
            return Err(not_found(product_id));
        }
        tracing::info!(product_id, "product deleted");
        Ok(())
    }
}

fn validate_payload(payload: &ProductPayload) -> Result<()> {
    payload.validate()?;
    check_money("price", payload.price)
}

fn not_found(product_id: i64) -> AppError {
    AppError::NotFound(format!("Product {} not found", product_id))
}
