use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use super::{Product, UserSummary};

/// Lifecycle of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    New,
    InProgress,
    Done,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "NEW",
            OrderStatus::InProgress => "IN_PROGRESS",
            OrderStatus::Done => "DONE",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    /// Case-insensitive, so `in_progress` parses as well
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NEW" => Ok(OrderStatus::New),
            "IN_PROGRESS" => Ok(OrderStatus::InProgress),
            "DONE" => Ok(OrderStatus::Done),
            other => Err(format!("unknown order status '{}'", other)),
        }
    }
}

/// Stored order row
#[derive(Debug, Clone, FromRow)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub order_status: String,
    pub total: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn status(&self) -> OrderStatus {
        self.order_status.parse().unwrap_or_default()
    }
}

/// Order line item joined with its product
#[derive(Debug, Clone, FromRow)]
pub struct OrderPosition {
    pub id: i64,
    pub order_id: i64,
    pub quantity: i32,
    pub product_id: i64,
    pub product_name: String,
    pub product_description: String,
    pub product_price: Decimal,
}

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Validate)]
pub struct PositionInput {
    pub product: i64,
    #[serde(default = "default_quantity")]
    #[validate(range(min = 1))]
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, message = "an order needs at least one product"))]
    pub products: Vec<PositionInput>,
    #[serde(default)]
    pub order_status: Option<OrderStatus>,
}

/// Full replacement: `products` is mandatory
pub type ReplaceOrderRequest = CreateOrderRequest;

/// Partial update: only the supplied parts change
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
pub struct PatchOrderRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "an order needs at least one product"))]
    pub products: Option<Vec<PositionInput>>,
    #[serde(default)]
    pub order_status: Option<OrderStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionResponse {
    pub id: i64,
    pub product: Product,
    pub quantity: i32,
}

impl From<OrderPosition> for PositionResponse {
    fn from(row: OrderPosition) -> Self {
        Self {
            id: row.id,
            product: Product {
                id: row.product_id,
                name: row.product_name,
                description: row.product_description,
                price: row.product_price,
            },
            quantity: row.quantity,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResponse {
    pub id: i64,
    pub user: UserSummary,
    pub products: Vec<PositionResponse>,
    pub order_status: OrderStatus,
    #[serde(serialize_with = "super::money::serialize_opt")]
    pub total: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderResponse {
    pub fn new(order: Order, user: UserSummary, positions: Vec<OrderPosition>) -> Self {
        Self {
            id: order.id,
            user,
            products: positions.into_iter().map(PositionResponse::from).collect(),
            order_status: order.status(),
            total: order.total,
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }
}
