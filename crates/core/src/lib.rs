//! Domain types and deterministic logic for the tank cost service.
//!
//! Everything in this crate is I/O-free: the order/cost-item records, the
//! tank specification and estimate types, the pricing estimator, and the
//! process-wide configuration loader. Persistence lives in `tankquote-db`,
//! the conversation orchestrator in `tankquote-agent`, and the HTTP surface
//! in `tankquote-server`.

pub mod config;
pub mod domain;
pub mod pricing;

pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions};
pub use domain::estimate::{EstimateBreakdown, PriceEstimate, TankSpecification};
pub use domain::order::{CostItem, Order, OrderDetails};
pub use pricing::{PricingConfig, PricingEstimator};
