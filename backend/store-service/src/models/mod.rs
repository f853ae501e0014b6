/// Data models for the store service
///
/// - `user`: accounts and the public user summary embedded in responses
/// - `product`: catalogue items
/// - `review`: one user's rating of one product
/// - `collection`: curated groups of products
/// - `order`: purchases and their line items
pub mod collection;
pub mod money;
pub mod order;
pub mod product;
pub mod review;
pub mod user;

pub use collection::{CollectionPayload, CollectionProductRef, CollectionResponse, ProductCollection};
pub use order::{
    CreateOrderRequest, Order, OrderPosition, OrderResponse, OrderStatus, PatchOrderRequest,
    PositionInput, PositionResponse, ReplaceOrderRequest,
};
pub use product::{Product, ProductPayload};
pub use review::{CreateReviewRequest, ProductReview, ReviewResponse, UpdateReviewRequest};
pub use user::{LoginRequest, RegisterRequest, User, UserSummary};
