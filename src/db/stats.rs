//! Grouped aggregates computed inside SQLite, for callers that want totals
//! without loading every record.

use std::collections::BTreeMap;

use anyhow::{Context, Result};

use crate::analytics::{DashboardStats, StageBudget};
use crate::db::Database;
use crate::db::project::parse_stage;
use crate::models::Stage;

fn active_stage_list() -> String {
    Stage::ALL
        .iter()
        .filter(|s| s.is_active())
        .map(|s| format!("'{}'", s.as_str().replace('\'', "''")))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn dashboard_totals(db: &Database) -> Result<DashboardStats> {
    let sql = format!(
        "SELECT COUNT(*), \
                COALESCE(SUM(CASE WHEN stage IN ({}) THEN 1 ELSE 0 END), 0), \
                COALESCE(SUM(forecast_spend), 0), \
                COALESCE(SUM(actual_spend), 0), \
                COALESCE(AVG(eligible_rd), 0.0) \
         FROM projects",
        active_stage_list()
    );

    let (total, active, budget, actual, avg_rd): (i64, i64, i64, i64, f64) = db
        .conn()
        .query_row(&sql, [], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
        })
        .context("failed to query dashboard totals")?;

    let mut stmt = db
        .conn()
        .prepare("SELECT stage, COUNT(*) FROM projects GROUP BY stage")?;
    let stage_distribution = stmt
        .query_map([], |row| {
            let stage = parse_stage(0, row.get(0)?)?;
            let count: i64 = row.get(1)?;
            Ok((stage, count as usize))
        })?
        .collect::<rusqlite::Result<BTreeMap<_, _>>>()
        .context("failed to query stage distribution")?;

    Ok(DashboardStats {
        total_projects: total as usize,
        active_projects: active as usize,
        total_budget: budget,
        total_actual_spend: actual,
        stage_distribution,
        avg_rd_percentage: avg_rd,
    })
}

/// Per-stage spend sums, ordered by stage.
pub fn budget_by_stage(db: &Database) -> Result<Vec<StageBudget>> {
    let mut stmt = db.conn().prepare(
        "SELECT stage, SUM(forecast_spend), SUM(actual_spend), COUNT(*) \
         FROM projects GROUP BY stage",
    )?;
    let mut budgets = stmt
        .query_map([], |row| {
            let count: i64 = row.get(3)?;
            Ok(StageBudget {
                stage: parse_stage(0, row.get(0)?)?,
                total_forecast: row.get(1)?,
                total_actual: row.get(2)?,
                count: count as usize,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to query budget by stage")?;

    budgets.sort_by_key(|b| b.stage);
    Ok(budgets)
}
