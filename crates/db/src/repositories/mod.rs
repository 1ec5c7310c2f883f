use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use tankquote_core::domain::estimate::TankSpecification;
use tankquote_core::domain::order::{Order, OrderDetails};

pub mod memory;
pub mod order;

pub use memory::InMemoryOrderRepository;
pub use order::SqlOrderRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    /// A fetched row held a value the domain type could not be built from;
    /// the message names the offending column.
    #[error("decode error: {0}")]
    Decode(String),
}

/// Read-only access to the historical order store. Implementations never
/// mutate the store and never retry on failure; errors propagate to the
/// caller as `RepositoryError`.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Up to `limit` orders, newest first. `limit` must be positive; this
    /// layer enforces no upper bound.
    async fn recent_orders(&self, limit: i64) -> Result<Vec<Order>, RepositoryError>;

    /// Order header plus cost items in `(group_no, line_no)` order, or
    /// `None` when the id is unknown.
    async fn order_details(&self, order_id: i64) -> Result<Option<OrderDetails>, RepositoryError>;

    /// Up to 5 orders whose diameter and volume each fall within ±10% of
    /// the specification, newest first. A zero diameter or volume collapses
    /// its band to an exact-zero match.
    async fn similar_orders(
        &self,
        spec: &TankSpecification,
    ) -> Result<Vec<Order>, RepositoryError>;

    /// Average unit price per `"<materialType>_<unitCode>"` over cost items
    /// with strictly positive price; rows without a material type are
    /// excluded.
    async fn material_prices(&self) -> Result<HashMap<String, f64>, RepositoryError>;

    /// Role name to day rate for rates valid today.
    async fn labor_rates(&self) -> Result<HashMap<String, f64>, RepositoryError>;
}
