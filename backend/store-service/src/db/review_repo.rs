use crate::filters::ReviewFilter;
use crate::models::review::ReviewDetailRow;
use crate::models::ProductReview;
use sqlx::{PgExecutor, Postgres, QueryBuilder};

const DETAIL_SELECT: &str = r#"
    SELECT r.id, r.review, r.grade, r.created_at, r.updated_at,
           u.id AS user_id, u.username, u.first_name, u.last_name,
           p.id AS product_id, p.name AS product_name,
           p.description AS product_description, p.price AS product_price
    FROM product_reviews r
    JOIN users u ON u.id = r.user_id
    JOIN products p ON p.id = r.product_id
"#;

const REVIEW_COLUMNS: &str = "id, user_id, product_id, review, grade, created_at, updated_at";

pub async fn list_reviews<'e, E: PgExecutor<'e>>(
    executor: E,
    filter: &ReviewFilter,
) -> Result<Vec<ReviewDetailRow>, sqlx::Error> {
    let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(DETAIL_SELECT);
    qb.push(" WHERE TRUE");
    filter.push_conditions(&mut qb);
    qb.push(" ORDER BY r.id");

    qb.build_query_as::<ReviewDetailRow>()
        .fetch_all(executor)
        .await
}

pub async fn find_review_detail<'e, E: PgExecutor<'e>>(
    executor: E,
    review_id: i64,
) -> Result<Option<ReviewDetailRow>, sqlx::Error> {
    sqlx::query_as::<_, ReviewDetailRow>(&format!("{DETAIL_SELECT} WHERE r.id = $1"))
        .bind(review_id)
        .fetch_optional(executor)
        .await
}

pub async fn find_review<'e, E: PgExecutor<'e>>(
    executor: E,
    review_id: i64,
) -> Result<Option<ProductReview>, sqlx::Error> {
    sqlx::query_as::<_, ProductReview>(&format!(
        "SELECT {REVIEW_COLUMNS} FROM product_reviews WHERE id = $1"
    ))
    .bind(review_id)
    .fetch_optional(executor)
    .await
}

pub async fn review_exists_for<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: i64,
    product_id: i64,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM product_reviews WHERE user_id = $1 AND product_id = $2)",
    )
    .bind(user_id)
    .bind(product_id)
    .fetch_one(executor)
    .await
}

pub async fn create_review<'e, E: PgExecutor<'e>>(
    executor: E,
    user_id: i64,
    product_id: i64,
    review: &str,
    grade: i32,
) -> Result<ProductReview, sqlx::Error> {
    sqlx::query_as::<_, ProductReview>(&format!(
        "INSERT INTO product_reviews (user_id, product_id, review, grade) \
         VALUES ($1, $2, $3, $4) RETURNING {REVIEW_COLUMNS}"
    ))
    .bind(user_id)
    .bind(product_id)
    .bind(review)
    .bind(grade)
    .fetch_one(executor)
    .await
}

pub async fn update_review<'e, E: PgExecutor<'e>>(
    executor: E,
    review_id: i64,
    review: &str,
    grade: i32,
) -> Result<Option<ProductReview>, sqlx::Error> {
    sqlx::query_as::<_, ProductReview>(&format!(
        "UPDATE product_reviews SET review = $2, grade = $3, updated_at = NOW() \
         WHERE id = $1 RETURNING {REVIEW_COLUMNS}"
    ))
    .bind(review_id)
    .bind(review)
    .bind(grade)
    .fetch_optional(executor)
    .await
}

pub async fn delete_review<'e, E: PgExecutor<'e>>(
    executor: E,
    review_id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM product_reviews WHERE id = $1")
        .bind(review_id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}
