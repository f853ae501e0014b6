/// Curated product collections
use crate::db::{collection_repo, product_repo};
use crate::error::{AppError, Result};
use crate::models::{CollectionPayload, CollectionResponse, Product, ProductCollection};
use crate::validators::{first_duplicate, first_missing};
use sqlx::{PgConnection, PgPool};
use std::collections::{BTreeSet, HashMap};
use validator::Validate;

/// Membership changes needed to go from the stored set to the requested one
#[derive(Debug, Default, PartialEq, Eq)]
pub struct MembershipDiff {
    pub to_add: Vec<i64>,
    pub to_remove: Vec<i64>,
}

impl MembershipDiff {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// `to_add = requested - current`, `to_remove = current - requested`, both sorted
pub fn diff_membership(current: &[i64], requested: &[i64]) -> MembershipDiff {
    let current: BTreeSet<i64> = current.iter().copied().collect();
    let requested: BTreeSet<i64> = requested.iter().copied().collect();

    MembershipDiff {
        to_add: requested.difference(&current).copied().collect(),
        to_remove: current.difference(&requested).copied().collect(),
    }
}

pub struct CollectionService {
    pool: PgPool,
}

impl CollectionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<CollectionResponse>> {
        let collections = collection_repo::list_collections(&self.pool).await?;
        let ids: Vec<i64> = collections.iter().map(|c| c.id).collect();

        let mut members: HashMap<i64, Vec<Product>> = HashMap::new();
        for row in collection_repo::list_members(&self.pool, &ids).await? {
            members.entry(row.collection_id).or_default().push(row.product);
        }

        Ok(collections
            .into_iter()
            .map(|collection| {
                let products = members.remove(&collection.id).unwrap_or_default();
                CollectionResponse::new(collection, products)
            })
            .collect())
    }

    pub async fn get(&self, collection_id: i64) -> Result<CollectionResponse> {
        let collection = collection_repo::find_collection(&self.pool, collection_id)
            .await?
            .ok_or_else(|| not_found(collection_id))?;
        self.with_members(collection).await
    }

    pub async fn create(&self, payload: &CollectionPayload) -> Result<CollectionResponse> {
        payload.validate()?;
        let requested = payload.product_ids();

        let mut tx = self.pool.begin().await?;
        check_products(&mut tx, &requested).await?;

        let collection =
            collection_repo::create_collection(&mut *tx, &payload.title, &payload.text).await?;
        collection_repo::add_members(&mut *tx, collection.id, &requested).await?;
        tx.commit().await?;

        tracing::info!(
            collection_id = collection.id,
            products = requested.len(),
            "collection created"
        );
        self.with_members(collection).await
    }

    /// Replace title, text and membership, touching only changed member rows
    pub async fn update(
        &self,
        collection_id: i64,
        payload: &CollectionPayload,
    ) -> Result<CollectionResponse> {
        let mut tx = self.pool.begin().await?;
        collection_repo::lock_collection(&mut *tx, collection_id)
            .await?
            .ok_or_else(|| not_found(collection_id))?;

        payload.validate()?;
        let requested = payload.product_ids();
        check_products(&mut tx, &requested).await?;

        let current = collection_repo::member_ids(&mut *tx, collection_id).await?;
        let diff = diff_membership(&current, &requested);

        let collection =
            collection_repo::update_collection(&mut *tx, collection_id, &payload.title, &payload.text)
                .await?;
        if !diff.to_remove.is_empty() {
            collection_repo::remove_members(&mut *tx, collection_id, &diff.to_remove).await?;
        }
        if !diff.to_add.is_empty() {
            collection_repo::add_members(&mut *tx, collection_id, &diff.to_add).await?;
        }
        tx.commit().await?;

        if !diff.is_empty() {
            tracing::info!(
                collection_id,
                added = ?diff.to_add,
                removed = ?diff.to_remove,
                "collection membership diff applied"
            );
        }
        self.with_members(collection).await
    }

    pub async fn delete(&self, collection_id: i64) -> Result<()> {
        if !collection_repo::delete_collection(&self.pool, collection_id).await? {
            return Err(not_found(collection_id));
        }
        tracing::info!(collection_id, "collection deleted");
        Ok(())
    }

    async fn with_members(&self, collection: ProductCollection) -> Result<CollectionResponse> {
        let products = collection_repo::list_members(&self.pool, &[collection.id])
            .await?
            .into_iter()
            .map(|row| row.product)
            .collect();
        Ok(CollectionResponse::new(collection, products))
    }
}

/// Requested ids must be distinct and refer to existing products
async fn check_products(conn: &mut PgConnection, requested: &[i64]) -> Result<()> {
    if let Some(duplicate) = first_duplicate(requested.iter().copied()) {
        return Err(AppError::BadRequest(format!(
            "Product {} is listed more than once",
            duplicate
        )));
    }
    if requested.is_empty() {
        return Ok(());
    }

    let existing: Vec<i64> = product_repo::find_products(&mut *conn, requested)
        .await?
        .into_iter()
        .map(|p| p.id)
        .collect();
    if let Some(missing) = first_missing(requested, &existing) {
        return Err(AppError::BadRequest(format!(
            "Product {} does not exist",
            missing
        )));
    }
    Ok(())
}

fn not_found(collection_id: i64) -> AppError {
    AppError::NotFound(format!("Collection {} not found", collection_id))
}
