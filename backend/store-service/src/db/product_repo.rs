use crate::filters::ProductFilter;
use crate::models::Product;
use rust_decimal::Decimal;
use sqlx::{PgExecutor, Postgres, QueryBuilder};

pub async fn list_products<'e, E: PgExecutor<'e>>(
    executor: E,
    filter: &ProductFilter,
) -> Result<Vec<Product>, sqlx::Error> {
    let mut qb: QueryBuilder<'_, Postgres> =
        QueryBuilder::new("SELECT p.id, p.name, p.description, p.price FROM products p WHERE TRUE");
    filter.push_conditions(&mut qb);
    qb.push(" ORDER BY p.id");

    qb.build_query_as::<Product>().fetch_all(executor).await
}

pub async fn find_product<'e, E: PgExecutor<'e>>(
    executor: E,
    product_id: i64,
) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>(
        "SELECT id, name, description, price FROM products WHERE id = $1",
    )
    .bind(product_id)
    .fetch_optional(executor)
    .await
}

/// Products with the given ids, ordered by id; unknown ids are skipped
pub async fn find_products<'e, E: PgExecutor<'e>>(
    executor: E,
    product_ids: &[i64],
) -> Result<Vec<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>(
        "SELECT id, name, description, price FROM products WHERE id = ANY($1) ORDER BY id",
    )
    .bind(product_ids)
    .fetch_all(executor)
    .await
}

pub async fn product_exists<'e, E: PgExecutor<'e>>(
    executor: E,
    product_id: i64,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
        .bind(product_id)
        .fetch_one(executor)
        .await
}

pub async fn create_product<'e, E: PgExecutor<'e>>(
    executor: E,
    name: &str,
    description: &str,
    price: Decimal,
) -> Result<Product, sqlx::Error> {
    sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO products (name, description, price)
        VALUES ($1, $2, $3)
        RETURNING id, name, description, price
        "#,
    )
    .bind(name)
    .bind(description)
    .bind(price)
    .fetch_one(executor)
    .await
}

pub async fn update_product<'e, E: PgExecutor<'e>>(
    executor: E,
    product_id: i64,
    name: &str,
    description: &str,
    price: Decimal,
) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>(
        r#"
        UPDATE products
        SET name = $2, description = $3, price = $4, updated_at = NOW()
        WHERE id = $1
        RETURNING id, name, description, price
        "#,
    )
    .bind(product_id)
    .bind(name)
    .bind(description)
    .bind(price)
    .fetch_optional(executor)
    .await
}

/// Returns false when no product had this id
pub async fn delete_product<'e, E: PgExecutor<'e>>(
    executor: E,
    product_id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(product_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}
