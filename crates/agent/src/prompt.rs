use std::collections::HashMap;

use tankquote_core::domain::estimate::{PriceEstimate, TankSpecification};
use tankquote_core::domain::order::Order;

/// Database context gathered for one chat turn.
#[derive(Clone, Debug, Default)]
pub struct AgentContextData {
    pub recent_orders: Vec<Order>,
    pub material_prices: HashMap<String, f64>,
    pub labor_rates: HashMap<String, f64>,
}

/// How many recent orders get summarized inline in the system prompt.
const PROMPT_ORDER_SUMMARY_LIMIT: usize = 3;

pub fn build_system_prompt(context: &AgentContextData) -> String {
    let material_prices =
        serde_json::to_string_pretty(&sorted(&context.material_prices)).unwrap_or_default();
    let labor_rates =
        serde_json::to_string_pretty(&sorted(&context.labor_rates)).unwrap_or_default();

    let mut prompt = format!(
        "You are the cost analysis expert of an industrial tank manufacturer. \
You prepare price quotations and cost analyses for customer tank orders.\n\n\
Available data:\n\
- Recent order count: {}\n\
- Average material prices (EUR): {material_prices}\n\
- Labor day rates (EUR): {labor_rates}\n\n\
Your tasks:\n\
1. Answer customer questions\n\
2. Estimate prices from tank specifications\n\
3. Reference similar past orders\n\
4. Explain the cost breakdown in detail\n\n\
Be professional and state all prices in EUR.",
        context.recent_orders.len()
    );

    if !context.recent_orders.is_empty() {
        let summary = context
            .recent_orders
            .iter()
            .take(PROMPT_ORDER_SUMMARY_LIMIT)
            .map(|order| {
                format!(
                    "- {}: {}, diameter: {}mm, volume: {}m3, price: {} EUR",
                    order.order_code,
                    order.customer_name,
                    order.diameter_mm,
                    order.volume,
                    order.total_price_eur
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        prompt.push_str("\n\nRecent orders:\n");
        prompt.push_str(&summary);
    }

    prompt
}

pub fn build_analysis_prompt(
    spec: &TankSpecification,
    estimate: &PriceEstimate,
    similar_orders: &[Order],
) -> String {
    let spec_json = serde_json::to_string_pretty(spec).unwrap_or_default();
    let estimate_json = serde_json::to_string_pretty(estimate).unwrap_or_default();
    let similar_json = serde_json::to_string_pretty(similar_orders).unwrap_or_default();

    format!(
        "Produce a detailed cost analysis for the following tank specification:\n\n\
Specification:\n{spec_json}\n\n\
Estimated price:\n{estimate_json}\n\n\
Similar past orders ({} found):\n{similar_json}\n\n\
Cover the following points:\n\
1. Reasoning behind the price estimate\n\
2. Comparison against the similar orders\n\
3. Optimization suggestions\n\
4. Risk factors",
        similar_orders.len()
    )
}

// BTreeMap so the embedded tables render in a stable order.
fn sorted(map: &HashMap<String, f64>) -> std::collections::BTreeMap<&str, f64> {
    map.iter().map(|(key, value)| (key.as_str(), *value)).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::{TimeZone, Utc};
    use tankquote_core::domain::estimate::TankSpecification;
    use tankquote_core::domain::order::Order;
    use tankquote_core::pricing::PricingEstimator;

    use super::{build_analysis_prompt, build_system_prompt, AgentContextData};

    fn order(id: i64) -> Order {
        Order {
            id,
            order_code: format!("TK-{id:04}"),
            customer_name: "Nordsee Chemie".to_string(),
            project_code: None,
            tank_name: None,
            diameter_mm: 1000.0,
            length_mm: 2000.0,
            volume: 100.0,
            material_grade: Some("standard".to_string()),
            quantity: 1,
            total_price_eur: 18400.0,
            total_weight_kg: 1250.0,
            labor_eur: 5200.0,
            outsource_eur: 800.0,
            created_date: None,
            created_at: Utc.with_ymd_and_hms(2026, 1, id as u32, 0, 0, 0).single().expect("ts"),
        }
    }

    #[test]
    fn system_prompt_embeds_counts_and_tables() {
        let mut material_prices = HashMap::new();
        material_prices.insert("Sheet Steel_KG".to_string(), 3.5);
        let mut labor_rates = HashMap::new();
        labor_rates.insert("Welder".to_string(), 240.0);

        let context = AgentContextData {
            recent_orders: vec![order(1), order(2)],
            material_prices,
            labor_rates,
        };
        let prompt = build_system_prompt(&context);

        assert!(prompt.contains("Recent order count: 2"));
        assert!(prompt.contains("Sheet Steel_KG"));
        assert!(prompt.contains("Welder"));
        assert!(prompt.contains("TK-0001"));
        assert!(prompt.contains("18400 EUR"));
    }

    #[test]
    fn order_summary_caps_at_three_entries() {
        let context = AgentContextData {
            recent_orders: (1..=5).map(order).collect(),
            ..AgentContextData::default()
        };
        let prompt = build_system_prompt(&context);

        assert!(prompt.contains("TK-0001"));
        assert!(prompt.contains("TK-0003"));
        assert!(!prompt.contains("TK-0004"));
    }

    #[test]
    fn empty_history_omits_the_summary_section() {
        let prompt = build_system_prompt(&AgentContextData::default());
        assert!(prompt.contains("Recent order count: 0"));
        assert!(!prompt.contains("Recent orders:"));
    }

    #[test]
    fn analysis_prompt_embeds_spec_estimate_and_similars() {
        let spec = TankSpecification {
            diameter_mm: 1000.0,
            length_mm: 2000.0,
            volume: 100.0,
            material_grade: "standard".to_string(),
            quantity: 1,
        };
        let estimate = PricingEstimator::default().estimate(&spec);
        let prompt = build_analysis_prompt(&spec, &estimate, &[order(1)]);

        assert!(prompt.contains("\"diameter_mm\": 1000.0"));
        assert!(prompt.contains("\"total_cost\""));
        assert!(prompt.contains("Similar past orders (1 found)"));
        assert!(prompt.contains("TK-0001"));
    }
}
