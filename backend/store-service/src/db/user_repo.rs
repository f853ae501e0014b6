use crate::models::User;
use sqlx::PgExecutor;

const USER_COLUMNS: &str =
    "id, username, first_name, last_name, password_hash, is_staff, created_at, updated_at";

pub async fn create_user<'e, E: PgExecutor<'e>>(
    executor: E,
    username: &str,
    first_name: &str,
    last_name: &str,
    password_hash: &str,
    is_staff: bool,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (username, first_name, last_name, password_hash, is_staff) \
         VALUES ($1, $2, $3, $4, $5) RETURNING {USER_COLUMNS}"
    ))
    .bind(username)
    .bind(first_name)
    .bind(last_name)
    .bind(password_hash)
    .bind(is_staff)
    .fetch_one(executor)
    .await
}

pub async fn find_by_username<'e, E: PgExecutor<'e>>(
    executor: E,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
    ))
    .bind(username)
    .fetch_optional(executor)
    .await
}

/// Create a staff account, or promote an existing one and reset its password
pub async fn upsert_staff<'e, E: PgExecutor<'e>>(
    executor: E,
    username: &str,
    password_hash: &str,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (username, password_hash, is_staff) VALUES ($1, $2, TRUE) \
         ON CONFLICT (username) DO UPDATE \
         SET password_hash = EXCLUDED.password_hash, is_staff = TRUE, updated_at = NOW() \
         RETURNING {USER_COLUMNS}"
    ))
    .bind(username)
    .bind(password_hash)
    .fetch_one(executor)
    .await
}
