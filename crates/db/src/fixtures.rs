//! Seed data for tests and local smoke runs. The production store is
//! populated by an external ingestion process; nothing here runs in the
//! request path.

use crate::DbPool;

/// Inserts a small, internally consistent order history:
/// seven orders (two with zero geometry), one fully itemized order
/// including rows with missing lookups, three labor roles with one
/// expired rate.
pub async fn seed_sample_orders(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(
        r#"
        INSERT INTO material_quality (id, name) VALUES
            (1, '1.4301'),
            (2, 'S235JR');

        INSERT INTO material_type (id, name) VALUES
            (1, 'Sheet Steel'),
            (2, 'Pipe'),
            (3, 'Welding Wire'),
            (4, 'Coating');

        INSERT INTO uom_unit (id, code) VALUES
            (1, 'KG'),
            (2, 'M');

        INSERT INTO labor_role (id, role_name) VALUES
            (1, 'Welder'),
            (2, 'Fitter'),
            (3, 'Painter');

        INSERT INTO labor_rate (id, role_id, day_rate_eur, valid_from, valid_to) VALUES
            (1, 1, 240.0, '2020-01-01', NULL),
            (2, 2, 220.0, '2020-01-01', '2099-12-31'),
            (3, 3, 200.0, '2020-01-01', '2021-01-01');
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::raw_sql(
        r#"
        INSERT INTO tank_order
            (id, order_code, customer_name, project_code, tank_name,
             diameter_mm, length_mm, volume, material_grade, quantity,
             total_price_eur, total_weight_kg, labor_eur, outsource_eur,
             created_date, created_at)
        VALUES
            (1, 'TK-1001', 'Nordsee Chemie', 'P-2026-01', 'Buffer Tank A',
             1000.0, 2000.0, 100.0, 'standard', 1,
             18400.0, 1250.0, 5200.0, 800.0,
             '2026-01-10', '2026-01-10T10:00:00Z'),
            (2, 'TK-1002', 'Baltik Marine', 'P-2026-02', 'Storage Tank',
             1050.0, 2400.0, 95.0, 'stainless 304', 2,
             41200.0, 1380.0, 9800.0, 0.0,
             '2026-02-10', '2026-02-10T10:00:00Z'),
            (3, 'TK-1003', 'Rhein Pharma', 'P-2026-03', 'Reactor Shell',
             2000.0, 5000.0, 400.0, 'duplex 2205', 1,
             96000.0, 4100.0, 21000.0, 3500.0,
             '2026-03-10', '2026-03-10T10:00:00Z'),
            (4, 'TK-1004', 'Nordsee Chemie', 'P-2026-04', 'Buffer Tank B',
             950.0, 1900.0, 108.0, 'standard', 1,
             17600.0, 1170.0, 4900.0, 650.0,
             '2026-04-10', '2026-04-10T10:00:00Z'),
            (5, 'TK-1005', 'Baltik Marine', NULL, 'Spare Parts Batch',
             0.0, 0.0, 0.0, NULL, 1,
             2400.0, 80.0, 1100.0, 0.0,
             '2026-05-10', '2026-05-10T10:00:00Z'),
            (6, 'TK-1006', 'Rhein Pharma', NULL, 'Fittings Only',
             0.0, 0.0, 0.0, NULL, 1,
             1900.0, 45.0, 900.0, 0.0,
             '2026-06-10', '2026-06-10T10:00:00Z'),
            (7, 'TK-1007', 'Donau Agrar', 'P-2026-07', 'Buffer Tank C',
             1100.0, 2200.0, 110.0, 'stainless 316L', 1,
             23900.0, 1410.0, 6100.0, 400.0,
             '2026-07-10', '2026-07-10T10:00:00Z');
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::raw_sql(
        r#"
        INSERT INTO cost_item
            (id, order_id, group_no, line_no, description, amount,
             material_quality_id, material_type_id, unit_id, unit_price_eur)
        VALUES
            (1, 1, 1, 1, 'Shell plate 5mm', 620.0, 2, 1, 1, 3.2),
            (2, 1, 1, 2, 'Dished head', 180.0, 2, 1, 1, 3.8),
            (3, 1, 2, 1, 'Nozzle pipe DN80', 12.0, 1, 2, 2, 12.0),
            (4, 1, 2, 2, 'Consumables', 1.0, NULL, NULL, 1, 5.0),
            (5, 1, 3, 1, 'Welding wire stock', 25.0, NULL, 3, 1, 0.0),
            (6, 1, 3, 2, 'Outsourced coating', 1.0, NULL, 4, NULL, 40.0);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
