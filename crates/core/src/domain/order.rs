use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One historical tank order as recorded by the upstream order-entry
/// process. Rows are read-only from this service's perspective.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub order_code: String,
    pub customer_name: String,
    pub project_code: Option<String>,
    pub tank_name: Option<String>,
    pub diameter_mm: f64,
    pub length_mm: f64,
    pub volume: f64,
    pub material_grade: Option<String>,
    pub quantity: i64,
    pub total_price_eur: f64,
    pub total_weight_kg: f64,
    pub labor_eur: f64,
    pub outsource_eur: f64,
    pub created_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// A priced line within an order, enriched with the joined lookup names.
/// `(group_no, line_no)` is the stable display order within the order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostItem {
    pub id: i64,
    pub order_id: i64,
    pub group_no: i64,
    pub line_no: i64,
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub unit_price_eur: f64,
    pub material_quality_name: Option<String>,
    pub material_type_name: Option<String>,
    pub unit_code: Option<String>,
}

/// Order header plus its cost items in display order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrderDetails {
    pub order: Order,
    pub cost_items: Vec<CostItem>,
}
