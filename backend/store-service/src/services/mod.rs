/// Business logic layer
///
/// Handlers do request parsing and role checks; services own validation,
/// object-level permissions and transactions.
pub mod accounts;
pub mod collections;
pub mod orders;
pub mod products;
pub mod reviews;

pub use accounts::AccountService;
pub use collections::{diff_membership, CollectionService, MembershipDiff};
pub use orders::{compute_total, OrderService};
pub use products::ProductService;
pub use reviews::ReviewService;
