use crate::models::{Product, ProductCollection};
use sqlx::{FromRow, PgExecutor};

const COLLECTION_COLUMNS: &str = "id, title, text, created_at, updated_at";

/// Member product tagged with the collection it belongs to
#[derive(Debug, Clone, FromRow)]
pub struct MemberRow {
    pub collection_id: i64,
    #[sqlx(flatten)]
    pub product: Product,
}

pub async fn list_collections<'e, E: PgExecutor<'e>>(
    executor: E,
) -> Result<Vec<ProductCollection>, sqlx::Error> {
    sqlx::query_as::<_, ProductCollection>(&format!(
        "SELECT {COLLECTION_COLUMNS} FROM product_collections ORDER BY id"
    ))
    .fetch_all(executor)
    .await
}

pub async fn find_collection<'e, E: PgExecutor<'e>>(
    executor: E,
    collection_id: i64,
) -> Result<Option<ProductCollection>, sqlx::Error> {
    sqlx::query_as::<_, ProductCollection>(&format!(
        "SELECT {COLLECTION_COLUMNS} FROM product_collections WHERE id = $1"
    ))
    .bind(collection_id)
    .fetch_optional(executor)
    .await
}

/// Lock the collection row for the rest of the transaction
pub async fn lock_collection<'e, E: PgExecutor<'e>>(
    executor: E,
    collection_id: i64,
) -> Result<Option<ProductCollection>, sqlx::Error> {
    sqlx::query_as::<_, ProductCollection>(&format!(
        "SELECT {COLLECTION_COLUMNS} FROM product_collections WHERE id = $1 FOR UPDATE"
    ))
    .bind(collection_id)
    .fetch_optional(executor)
    .await
}

/// Members of the given collections, ordered by collection then product id
pub async fn list_members<'e, E: PgExecutor<'e>>(
    executor: E,
    collection_ids: &[i64],
) -> Result<Vec<MemberRow>, sqlx::Error> {
    sqlx::query_as::<_, MemberRow>(
        r#"
        SELECT cp.collection_id, p.id, p.name, p.description, p.price
        FROM product_collection_products cp
        JOIN products p ON p.id = cp.product_id
        WHERE cp.collection_id = ANY($1)
        ORDER BY cp.collection_id, p.id
        "#,
    )
    .bind(collection_ids)
    .fetch_all(executor)
    .await
}

pub async fn member_ids<'e, E: PgExecutor<'e>>(
    executor: E,
    collection_id: i64,
) -> Result<Vec<i64>, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT product_id FROM product_collection_products WHERE collection_id = $1",
    )
    .bind(collection_id)
    .fetch_all(executor)
    .await
}

pub async fn create_collection<'e, E: PgExecutor<'e>>(
    executor: E,
    title: &str,
    text: &str,
) -> Result<ProductCollection, sqlx::Error> {
    sqlx::query_as::<_, ProductCollection>(&format!(
        "INSERT INTO product_collections (title, text) VALUES ($1, $2) \
         RETURNING {COLLECTION_COLUMNS}"
    ))
    .bind(title)
    .bind(text)
    .fetch_one(executor)
    .await
}

pub async fn update_collection<'e, E: PgExecutor<'e>>(
    executor: E,
    collection_id: i64,
    title: &str,
    text: &str,
) -> Result<ProductCollection, sqlx::Error> {
    sqlx::query_as::<_, ProductCollection>(&format!(
        "UPDATE product_collections SET title = $2, text = $3, updated_at = NOW() \
         WHERE id = $1 RETURNING {COLLECTION_COLUMNS}"
    ))
    .bind(collection_id)
    .bind(title)
    .bind(text)
    .fetch_one(executor)
    .await
}

pub async fn add_members<'e, E: PgExecutor<'e>>(
    executor: E,
    collection_id: i64,
    product_ids: &[i64],
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO product_collection_products (collection_id, product_id)
        SELECT $1, UNNEST($2::BIGINT[])
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(collection_id)
    .bind(product_ids)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

pub async fn remove_members<'e, E: PgExecutor<'e>>(
    executor: E,
    collection_id: i64,
    product_ids: &[i64],
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "DELETE FROM product_collection_products WHERE collection_id = $1 AND product_id = ANY($2)",
    )
    .bind(collection_id)
    .bind(product_ids)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

pub async fn delete_collection<'e, E: PgExecutor<'e>>(
    executor: E,
    collection_id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM product_collections WHERE id = $1")
        .bind(collection_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}
