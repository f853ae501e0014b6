/// Account registration, login and staff provisioning
use crate::db::user_repo;
use crate::error::{is_unique_violation, AppError, Result};
use crate::models::{LoginRequest, RegisterRequest, User, UserSummary};
use crate::security::{hash_password, verify_password};
use crypto_core::jwt::{self, TokenResponse};
use sqlx::PgPool;
use validator::Validate;

/// Shortest password accepted for any account
pub const MIN_PASSWORD_LEN: usize = 8;

pub struct AccountService {
    pool: PgPool,
}

impl AccountService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a regular (non-staff) account
    pub async fn register(&self, req: &RegisterRequest) -> Result<UserSummary> {
        let req = req.normalized();
        req.validate()?;

        let password_hash = hash_password(&req.password)?;
        let user = user_repo::create_user(
            &self.pool,
            &req.username,
            &req.first_name,
            &req.last_name,
            &password_hash,
            false,
        )
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict(format!("Username '{}' is already taken", req.username))
            } else {
                AppError::Database(e)
            }
        })?;

        tracing::info!(user_id = user.id, username = %user.username, "user registered");
        Ok(UserSummary::from(&user))
    }

    /// Exchange credentials for an access token
    pub async fn login(&self, req: &LoginRequest, ttl_secs: i64) -> Result<TokenResponse> {
        let invalid = || AppError::Authentication("Invalid username or password".to_string());

        let user = user_repo::find_by_username(&self.pool, req.username.trim())
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(&req.password, &user.password_hash)? {
            tracing::warn!(user_id = user.id, "login failed: wrong password");
            return Err(invalid());
        }

        let token = jwt::issue_token_response(user.id, &user.username, user.is_staff, ttl_secs)?;
        tracing::info!(user_id = user.id, "access token issued");
        Ok(token)
    }

    /// Create a staff account, or promote an existing user and reset the password
    pub async fn create_staff(&self, username: &str, password: &str) -> Result<User> {
        let username = username.trim();
        if username.is_empty() || username.chars().count() > 150 {
            return Err(AppError::Validation(
                "username must be between 1 and 150 characters".to_string(),
            ));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::Validation(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let password_hash = hash_password(password)?;
        let user = user_repo::upsert_staff(&self.pool, username, &password_hash).await?;

        tracing::info!(user_id = user.id, username = %user.username, "staff account ready");
        Ok(user)
    }
}
