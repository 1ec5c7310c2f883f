use std::collections::HashMap;

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row};

use tankquote_core::domain::estimate::TankSpecification;
use tankquote_core::domain::order::{CostItem, Order, OrderDetails};

use super::{OrderRepository, RepositoryError};
use crate::DbPool;

/// Half-width of the similarity band around a specification value.
const SIMILARITY_TOLERANCE: f64 = 0.1;
const SIMILAR_ORDERS_LIMIT: i64 = 5;

const ORDER_COLUMNS: &str = "\
    id, order_code, customer_name, project_code, tank_name, \
    diameter_mm, length_mm, volume, material_grade, quantity, \
    total_price_eur, total_weight_kg, labor_eur, outsource_eur, \
    created_date, created_at";

pub struct SqlOrderRepository {
    pool: DbPool,
}

impl SqlOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl OrderRepository for SqlOrderRepository {
    async fn recent_orders(&self, limit: i64) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM tank_order ORDER BY created_at DESC LIMIT ?"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_order).collect()
    }

    async fn order_details(&self, order_id: i64) -> Result<Option<OrderDetails>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {ORDER_COLUMNS} FROM tank_order WHERE id = ?"))
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let order = map_order(&row)?;

        let item_rows = sqlx::query(
            r#"
            SELECT
                ci.id,
                ci.order_id,
                ci.group_no,
                ci.line_no,
                ci.description,
                ci.amount,
                ci.unit_price_eur,
                mq.name AS material_quality_name,
                mt.name AS material_type_name,
                uu.code AS unit_code
            FROM cost_item ci
            LEFT JOIN material_quality mq ON ci.material_quality_id = mq.id
            LEFT JOIN material_type mt ON ci.material_type_id = mt.id
            LEFT JOIN uom_unit uu ON ci.unit_id = uu.id
            WHERE ci.order_id = ?
            ORDER BY ci.group_no, ci.line_no
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        let cost_items =
            item_rows.iter().map(map_cost_item).collect::<Result<Vec<_>, _>>()?;

        Ok(Some(OrderDetails { order, cost_items }))
    }

    async fn similar_orders(
        &self,
        spec: &TankSpecification,
    ) -> Result<Vec<Order>, RepositoryError> {
        // A zero diameter or volume collapses its band to [0, 0], matching
        // only exact zeros. Accepted default behavior.
        let rows = sqlx::query(&format!(
            "SELECT {ORDER_COLUMNS} FROM tank_order \
             WHERE diameter_mm BETWEEN ? AND ? AND volume BETWEEN ? AND ? \
             ORDER BY created_at DESC LIMIT ?"
        ))
        .bind(spec.diameter_mm * (1.0 - SIMILARITY_TOLERANCE))
        .bind(spec.diameter_mm * (1.0 + SIMILARITY_TOLERANCE))
        .bind(spec.volume * (1.0 - SIMILARITY_TOLERANCE))
        .bind(spec.volume * (1.0 + SIMILARITY_TOLERANCE))
        .bind(SIMILAR_ORDERS_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_order).collect()
    }

    async fn material_prices(&self) -> Result<HashMap<String, f64>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT
                mt.name AS material_type,
                uu.code AS unit,
                AVG(ci.unit_price_eur) AS avg_price
            FROM cost_item ci
            LEFT JOIN material_type mt ON ci.material_type_id = mt.id
            LEFT JOIN uom_unit uu ON ci.unit_id = uu.id
            WHERE ci.unit_price_eur > 0
            GROUP BY mt.name, uu.code
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut prices = HashMap::new();
        for row in &rows {
            let material_type: Option<String> = column(row, "material_type")?;
            let Some(material_type) = material_type else {
                continue;
            };
            let unit: Option<String> = column(row, "unit")?;
            let avg_price: f64 = column(row, "avg_price")?;
            // a missing unit keys with a bare trailing underscore
            prices.insert(format!("{material_type}_{}", unit.unwrap_or_default()), avg_price);
        }

        Ok(prices)
    }

    async fn labor_rates(&self) -> Result<HashMap<String, f64>, RepositoryError> {
        let today = Utc::now().date_naive();
        let rows = sqlx::query(
            r#"
            SELECT lr.role_name, lrate.day_rate_eur
            FROM labor_rate lrate
            JOIN labor_role lr ON lrate.role_id = lr.id
            WHERE lrate.valid_from <= ?
                AND (lrate.valid_to IS NULL OR lrate.valid_to >= ?)
            "#,
        )
        .bind(today)
        .bind(today)
        .fetch_all(&self.pool)
        .await?;

        let mut rates = HashMap::new();
        for row in &rows {
            let role_name: String = column(row, "role_name")?;
            let day_rate: f64 = column(row, "day_rate_eur")?;
            rates.insert(role_name, day_rate);
        }

        Ok(rates)
    }
}

/// Reads one column, turning a failed conversion into a `Decode` error
/// that names the column.
fn column<'r, T>(row: &'r SqliteRow, name: &str) -> Result<T, RepositoryError>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(name)
        .map_err(|source| RepositoryError::Decode(format!("column `{name}`: {source}")))
}

fn map_order(row: &SqliteRow) -> Result<Order, RepositoryError> {
    Ok(Order {
        id: column(row, "id")?,
        order_code: column(row, "order_code")?,
        customer_name: column(row, "customer_name")?,
        project_code: column(row, "project_code")?,
        tank_name: column(row, "tank_name")?,
        diameter_mm: column(row, "diameter_mm")?,
        length_mm: column(row, "length_mm")?,
        volume: column(row, "volume")?,
        material_grade: column(row, "material_grade")?,
        quantity: column(row, "quantity")?,
        total_price_eur: column(row, "total_price_eur")?,
        total_weight_kg: column(row, "total_weight_kg")?,
        labor_eur: column(row, "labor_eur")?,
        outsource_eur: column(row, "outsource_eur")?,
        created_date: column(row, "created_date")?,
        created_at: column(row, "created_at")?,
    })
}

fn map_cost_item(row: &SqliteRow) -> Result<CostItem, RepositoryError> {
    Ok(CostItem {
        id: column(row, "id")?,
        order_id: column(row, "order_id")?,
        group_no: column(row, "group_no")?,
        line_no: column(row, "line_no")?,
        description: column(row, "description")?,
        amount: column(row, "amount")?,
        unit_price_eur: column(row, "unit_price_eur")?,
        material_quality_name: column(row, "material_quality_name")?,
        material_type_name: column(row, "material_type_name")?,
        unit_code: column(row, "unit_code")?,
    })
}
