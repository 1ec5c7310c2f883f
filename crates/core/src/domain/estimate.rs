use serde::{Deserialize, Serialize};

fn default_quantity() -> i64 {
    1
}

/// Caller-supplied tank geometry and material description. Transient per
/// request; never persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TankSpecification {
    #[serde(default)]
    pub diameter_mm: f64,
    #[serde(default)]
    pub length_mm: f64,
    #[serde(default)]
    pub volume: f64,
    #[serde(default)]
    pub material_grade: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

impl Default for TankSpecification {
    fn default() -> Self {
        Self {
            diameter_mm: 0.0,
            length_mm: 0.0,
            volume: 0.0,
            material_grade: String::new(),
            quantity: 1,
        }
    }
}

/// Intermediate quantities behind an estimate, already rounded for display.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EstimateBreakdown {
    pub surface_area_m2: f64,
    pub estimated_weight_kg: f64,
    pub material_price_per_kg: f64,
    pub labor_hours: f64,
    pub labor_rate_per_hour: f64,
    pub overhead_percentage: f64,
    pub unit_price: f64,
    pub quantity: i64,
}

/// Itemized cost estimate for a tank specification. The four cost figures
/// are each rounded to two decimals independently, so `total_cost` is not
/// guaranteed to equal the sum of the other three.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceEstimate {
    pub material_cost: f64,
    pub labor_cost: f64,
    pub overhead_cost: f64,
    pub total_cost: f64,
    pub currency: String,
    pub breakdown: EstimateBreakdown,
}
