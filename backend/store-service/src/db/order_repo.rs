use crate::filters::OrderFilter;
use crate::models::{Order, OrderPosition, OrderStatus, UserSummary};
use rust_decimal::Decimal;
use sqlx::{PgExecutor, Postgres, QueryBuilder};

const ORDER_COLUMNS: &str = "id, user_id, order_status, total, created_at, updated_at";

/// Orders matching `filter`; restricted to one owner when `owner_id` is set
pub async fn list_orders<'e, E: PgExecutor<'e>>(
    executor: E,
    filter: &OrderFilter,
    owner_id: Option<i64>,
) -> Result<Vec<Order>, sqlx::Error> {
    let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(
        "SELECT o.id, o.user_id, o.order_status, o.total, o.created_at, o.updated_at \
         FROM orders o WHERE TRUE",
    );
    if let Some(owner_id) = owner_id {
        qb.push(" AND o.user_id = ").push_bind(owner_id);
    }
    filter.push_conditions(&mut qb);
    qb.push(" ORDER BY o.id");

    qb.build_query_as::<Order>().fetch_all(executor).await
}

pub async fn find_order<'e, E: PgExecutor<'e>>(
    executor: E,
    order_id: i64,
) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
        .bind(order_id)
        .fetch_optional(executor)
        .await
}

pub async fn lock_order<'e, E: PgExecutor<'e>>(
    executor: E,
    order_id: i64,
) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as::<_, Order>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 FOR UPDATE"
    ))
    .bind(order_id)
    .fetch_optional(executor)
    .await
}

/// Line items of the given orders, ordered by order then position id
pub async fn list_positions<'e, E: PgExecutor<'e>>(
    executor: E,
    order_ids: &[i64],
) -> Result<Vec<OrderPosition>, sqlx::Error> {
    sqlx::query_as::<_, OrderPosition>(
        r#"
        SELECT pos.id, pos.order_id, pos.quantity,
               p.id AS product_id, p.name AS product_name,
               p.description AS product_description, p.price AS product_price
        FROM product_order_positions pos
        JOIN products p ON p.id = pos.product_id
        WHERE pos.order_id = ANY($1)
        ORDER BY pos.order_id, pos.id
        "#,
    )
    .bind(order_ids)
    .fetch_all(executor)
    .await
}

pub async fn user_summaries<'e, E: PgExecutor<'e>>(
    executor: E,
    user_ids: &[i64],
) -> Result<Vec<UserSummary>, sqlx::Error> {
    sqlx::query_as::<_, UserSummary>(
        "SELECT id, username, first_name, last_name FROM users WHERE id = ANY($1)",
    )
    .bind(user_ids)
    .fetch_all(executor)
    .await
}

pub async fn create_order<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: i64,
    status: OrderStatus,
    total: Decimal,
) -> Result<Order, sqlx::Error> {
    sqlx::query_as::<_, Order>(&format!(
        "INSERT INTO orders (user_id, order_status, total) VALUES ($1, $2, $3) \
         RETURNING {ORDER_COLUMNS}"
    ))
    .bind(user_id)
    .bind(status.as_str())
    .bind(total)
    .fetch_one(executor)
    .await
}

/// Write new status and total; `None` keeps the stored value
pub async fn update_order<'e, E: PgExecutor<'e>>(
    executor: E,
    order_id: i64,
    status: Option<OrderStatus>,
    total: Option<Decimal>,
) -> Result<Order, sqlx::Error> {
    sqlx::query_as::<_, Order>(&format!(
        "UPDATE orders \
         SET order_status = COALESCE($2, order_status), total = COALESCE($3, total), \
             updated_at = NOW() \
         WHERE id = $1 RETURNING {ORDER_COLUMNS}"
    ))
    .bind(order_id)
    .bind(status.map(|s| s.as_str()))
    .bind(total)
    .fetch_one(executor)
    .await
}

pub async fn insert_positions<'e, E: PgExecutor<'e>>(
    executor: E,
    order_id: i64,
    product_ids: &[i64],
    quantities: &[i32],
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO product_order_positions (order_id, product_id, quantity)
        SELECT $1, item.product_id, item.quantity
        FROM UNNEST($2::BIGINT[], $3::INTEGER[]) AS item(product_id, quantity)
        "#,
    )
    .bind(order_id)
    .bind(product_ids)
    .bind(quantities)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

pub async fn delete_positions<'e, E: PgExecutor<'e>>(
    executor: E,
    order_id: i64,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM product_order_positions WHERE order_id = $1")
        .bind(order_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

pub async fn delete_order<'e, E: PgExecutor<'e>>(
    executor: E,
    order_id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM orders WHERE id = $1")
        .bind(order_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}
