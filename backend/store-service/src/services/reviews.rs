/// Product reviews, one per user and product
use crate::db::{product_repo, review_repo};
use crate::error::{is_foreign_key_violation, is_unique_violation, AppError, Result};
use crate::filters::ReviewFilter;
use crate::middleware::{check_owner_or_staff, Principal};
use crate::models::{CreateReviewRequest, ReviewResponse, UpdateReviewRequest};
use sqlx::PgPool;
use validator::Validate;

pub struct ReviewService {
    pool: PgPool,
}

impl ReviewService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, filter: &ReviewFilter) -> Result<Vec<ReviewResponse>> {
        let rows = review_repo::list_reviews(&self.pool, filter).await?;
        Ok(rows.into_iter().map(ReviewResponse::from).collect())
    }

    pub async fn get(&self, review_id: i64) -> Result<ReviewResponse> {
        review_repo::find_review_detail(&self.pool, review_id)
            .await?
            .map(ReviewResponse::from)
            .ok_or_else(|| not_found(review_id))
    }

    /// Post a review as `author`; a second review of the same product is rejected
    pub async fn create(
        &self,
        author: &Principal,
        req: &CreateReviewRequest,
    ) -> Result<ReviewResponse> {
        req.validate()?;
        self.ensure_product_exists(req.product_id).await?;

        if review_repo::review_exists_for(&self.pool, author.user_id, req.product_id).await? {
            tracing::info!(
                user_id = author.user_id,
                product_id = req.product_id,
                "duplicate review rejected"
            );
            return Err(duplicate_review());
        }

        let review = review_repo::create_review(
            &self.pool,
            author.user_id,
            req.product_id,
            &req.review,
            req.grade,
        )
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                tracing::info!(
                    user_id = author.user_id,
                    product_id = req.product_id,
                    "duplicate review rejected by constraint"
                );
                duplicate_review()
            } else if is_foreign_key_violation(&e) {
                missing_product(req.product_id)
            } else {
                AppError::Database(e)
            }
        })?;

        tracing::info!(
            review_id = review.id,
            user_id = author.user_id,
            product_id = req.product_id,
            "review created"
        );
        self.get(review.id).await
    }

    /// Change text and grade; the reviewed product stays the same
    pub async fn update(
        &self,
        caller: &Principal,
        review_id: i64,
        req: &UpdateReviewRequest,
    ) -> Result<ReviewResponse> {
        let existing = review_repo::find_review(&self.pool, review_id)
            .await?
            .ok_or_else(|| not_found(review_id))?;
        check_owner_or_staff(caller, existing.user_id)?;

        req.validate()?;
        if let Some(product_id) = req.product_id {
            self.ensure_product_exists(product_id).await?;
        }

        review_repo::update_review(&self.pool, review_id, &req.review, req.grade)
            .await?
            .ok_or_else(|| not_found(review_id))?;

        self.get(review_id).await
    }

    pub async fn delete(&self, caller: &Principal, review_id: i64) -> Result<()> {
        let existing = review_repo::find_review(&self.pool, review_id)
            .await?
            .ok_or_else(|| not_found(review_id))?;
        check_owner_or_staff(caller, existing.user_id)?;

        review_repo::delete_review(&self.pool, review_id).await?;
        tracing::info!(review_id, user_id = caller.user_id, "review deleted");
        Ok(())
    }

    async fn ensure_product_exists(&self, product_id: i64) -> Result<()> {
        if product_repo::product_exists(&self.pool, product_id).await? {
            Ok(())
        } else {
            Err(missing_product(product_id))
        }
    }
}

fn not_found(review_id: i64) -> AppError {
    AppError::NotFound(format!("Review {} not found", review_id))
}

fn missing_product(product_id: i64) -> AppError {
    AppError::BadRequest(format!("Product {} does not exist", product_id))
}

fn duplicate_review() -> AppError {
    AppError::BadRequest("You have already reviewed this product".to_string())
}
