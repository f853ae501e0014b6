use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::{Product, UserSummary};

/// Stored review row
#[derive(Debug, Clone, FromRow)]
pub struct ProductReview {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub review: String,
    pub grade: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Review joined with its author and product
#[derive(Debug, Clone, FromRow)]
pub struct ReviewDetailRow {
    pub id: i64,
    pub review: String,
    pub grade: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub product_id: i64,
    pub product_name: String,
    pub product_description: String,
    pub product_price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub id: i64,
    pub user: UserSummary,
    pub product: Product,
    pub review: String,
    pub grade: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ReviewDetailRow> for ReviewResponse {
    fn from(row: ReviewDetailRow) -> Self {
        Self {
            id: row.id,
            user: UserSummary {
                id: row.user_id,
                username: row.username,
                first_name: row.first_name,
                last_name: row.last_name,
            },
            product: Product {
                id: row.product_id,
                name: row.product_name,
                description: row.product_description,
                price: row.product_price,
            },
            review: row.review,
            grade: row.grade,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateReviewRequest {
    pub product_id: i64,
    #[validate(length(min = 1))]
    pub review: String,
    #[validate(range(min = 1, max = 5))]
    pub grade: i32,
}

/// The reviewed product never changes; `product_id` is only checked for existence.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct UpdateReviewRequest {
    #[serde(default)]
    pub product_id: Option<i64>,
    #[validate(length(min = 1))]
    pub review: String,
    #[validate(range(min = 1, max = 5))]
    pub grade: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_must_be_between_one_and_five() {
        for grade in 1..=5 {
            let req = CreateReviewRequest {
                product_id: 1,
                review: "fine".into(),
                grade,
            };
            assert!(req.validate().is_ok(), "grade {grade} should be valid");
        }
        for grade in [0, 6, -1] {
            let req = CreateReviewRequest {
                product_id: 1,
                review: "fine".into(),
                grade,
            };
            assert!(req.validate().is_err(), "grade {grade} should be rejected");
        }
    }

    #[test]
    fn detail_row_nests_user_and_product() {
        let now = Utc::now();
        let row = ReviewDetailRow {
            id: 3,
            review: "great".into(),
            grade: 5,
            created_at: now,
            updated_at: now,
            user_id: 7,
            username: "alice".into(),
            first_name: "Alice".into(),
            last_name: "Liddell".into(),
            product_id: 11,
            product_name: "Tea".into(),
            product_description: "Green tea".into(),
            product_price: Decimal::new(450, 2),
        };

        let json = serde_json::to_value(ReviewResponse::from(row)).unwrap();
        assert_eq!(json["user"]["id"], 7);
        assert_eq!(json["user"]["username"], "alice");
        assert_eq!(json["product"]["id"], 11);
        assert_eq!(json["product"]["price"], "4.50");
        assert_eq!(json["grade"], 5);
    }

    #[test]
    fn update_request_product_id_is_optional() {
        let req: UpdateReviewRequest =
            serde_json::from_str(r#"{"review": "meh", "grade": 2}"#).unwrap();
        assert!(req.product_id.is_none());
    }
}
