use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::domain::estimate::{EstimateBreakdown, PriceEstimate, TankSpecification};

/// Fixed wall thickness assumed for the weight estimate, in meters.
const WALL_THICKNESS_M: f64 = 0.005;
/// Carbon steel density, kg/m³.
const STEEL_DENSITY_KG_M3: f64 = 7850.0;
/// Base material price before grade multiplier and markup, EUR/kg.
const BASE_MATERIAL_PRICE_EUR_KG: f64 = 3.5;
/// Baseline fabrication hours before the volume-driven component.
const BASE_LABOR_HOURS: f64 = 20.0;

const CURRENCY: &str = "EUR";

/// Tunable pricing parameters, loaded once from configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    pub labor_rate_eur_per_hour: f64,
    pub overhead_percentage: f64,
    pub material_markup: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self { labor_rate_eur_per_hour: 25.0, overhead_percentage: 15.0, material_markup: 1.2 }
    }
}

/// Deterministic, stateless cost estimator. Safe to share across requests.
#[derive(Clone, Debug, Default)]
pub struct PricingEstimator {
    config: PricingConfig,
}

impl PricingEstimator {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Estimate manufacturing cost for one tank specification.
    ///
    /// Each of the four cost outputs is scaled by quantity and rounded to
    /// two decimals independently of the others; the rounded total may
    /// therefore differ from the sum of the rounded components. That
    /// discrepancy is part of the published contract.
    pub fn estimate(&self, spec: &TankSpecification) -> PriceEstimate {
        let quantity = spec.quantity;

        // Simplified cylinder shell: circumference x length.
        let surface_area_m2 = (PI * spec.diameter_mm * spec.length_mm) / 1_000_000.0;
        let weight_kg = surface_area_m2 * WALL_THICKNESS_M * STEEL_DENSITY_KG_M3;

        let multiplier = material_multiplier(&spec.material_grade);
        let material_cost =
            weight_kg * BASE_MATERIAL_PRICE_EUR_KG * multiplier * self.config.material_markup;

        let labor_hours = BASE_LABOR_HOURS + spec.volume / 10.0;
        let labor_cost = labor_hours * self.config.labor_rate_eur_per_hour;

        let overhead_cost =
            (material_cost + labor_cost) * (self.config.overhead_percentage / 100.0);

        let unit_total = material_cost + labor_cost + overhead_cost;
        let quantity_f = quantity as f64;

        PriceEstimate {
            material_cost: round2(material_cost * quantity_f),
            labor_cost: round2(labor_cost * quantity_f),
            overhead_cost: round2(overhead_cost * quantity_f),
            total_cost: round2(unit_total * quantity_f),
            currency: CURRENCY.to_string(),
            breakdown: EstimateBreakdown {
                surface_area_m2: round2(surface_area_m2),
                estimated_weight_kg: round2(weight_kg),
                material_price_per_kg: round2(BASE_MATERIAL_PRICE_EUR_KG * multiplier),
                labor_hours: round2(labor_hours),
                labor_rate_per_hour: self.config.labor_rate_eur_per_hour,
                overhead_percentage: self.config.overhead_percentage,
                unit_price: round2(unit_total),
                quantity,
            },
        }
    }
}

/// Grade multiplier on the base material price. "duplex" is checked before
/// "stainless" so a grade naming both resolves to the duplex multiplier.
fn material_multiplier(material_grade: &str) -> f64 {
    let grade = material_grade.to_lowercase();
    if grade.contains("duplex") {
        2.5
    } else if grade.contains("stainless") {
        2.0
    } else {
        1.0
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
