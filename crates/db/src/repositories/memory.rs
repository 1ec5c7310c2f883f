use std::collections::HashMap;

use tankquote_core::domain::estimate::TankSpecification;
use tankquote_core::domain::order::{CostItem, Order, OrderDetails};

use super::{OrderRepository, RepositoryError};

/// In-memory stand-in for the SQL store. The order history is read-only at
/// runtime, so this holds plain collections fixed at construction.
#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: Vec<Order>,
    cost_items: HashMap<i64, Vec<CostItem>>,
    material_prices: HashMap<String, f64>,
    labor_rates: HashMap<String, f64>,
}

impl InMemoryOrderRepository {
    pub fn new(orders: Vec<Order>) -> Self {
        Self { orders, ..Self::default() }
    }

    pub fn with_cost_items(mut self, order_id: i64, items: Vec<CostItem>) -> Self {
        self.cost_items.insert(order_id, items);
        self
    }

    pub fn with_material_prices(mut self, prices: HashMap<String, f64>) -> Self {
        self.material_prices = prices;
        self
    }

    pub fn with_labor_rates(mut self, rates: HashMap<String, f64>) -> Self {
        self.labor_rates = rates;
        self
    }
}

#[async_trait::async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn recent_orders(&self, limit: i64) -> Result<Vec<Order>, RepositoryError> {
        let mut orders = self.orders.clone();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        orders.truncate(limit.max(0) as usize);
        Ok(orders)
    }

    async fn order_details(&self, order_id: i64) -> Result<Option<OrderDetails>, RepositoryError> {
        let Some(order) = self.orders.iter().find(|order| order.id == order_id) else {
            return Ok(None);
        };
        let mut cost_items = self.cost_items.get(&order_id).cloned().unwrap_or_default();
        cost_items.sort_by_key(|item| (item.group_no, item.line_no));
        Ok(Some(OrderDetails { order: order.clone(), cost_items }))
    }

    async fn similar_orders(
        &self,
        spec: &TankSpecification,
    ) -> Result<Vec<Order>, RepositoryError> {
        let diameter_band = (spec.diameter_mm * 0.9)..=(spec.diameter_mm * 1.1);
        let volume_band = (spec.volume * 0.9)..=(spec.volume * 1.1);

        let mut matches: Vec<Order> = self
            .orders
            .iter()
            .filter(|order| {
                diameter_band.contains(&order.diameter_mm) && volume_band.contains(&order.volume)
            })
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matches.truncate(5);
        Ok(matches)
    }

    async fn material_prices(&self) -> Result<HashMap<String, f64>, RepositoryError> {
        Ok(self.material_prices.clone())
    }

    async fn labor_rates(&self) -> Result<HashMap<String, f64>, RepositoryError> {
        Ok(self.labor_rates.clone())
    }
}
