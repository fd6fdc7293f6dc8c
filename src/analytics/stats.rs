use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analytics::tax_credit::tax_credit;
use crate::models::{Project, Stage};

/// Portfolio-wide aggregates shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_projects: usize,
    pub active_projects: usize,
    pub total_budget: i64,
    pub total_actual_spend: i64,
    /// Only stages present in the input appear here.
    pub stage_distribution: BTreeMap<Stage, usize>,
    #[serde(rename = "avgRDPercentage")]
    pub avg_rd_percentage: f64,
}

/// Forecast and actual spend totals for one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageBudget {
    pub stage: Stage,
    pub total_forecast: i64,
    pub total_actual: i64,
    pub count: usize,
}

/// Single pass over `projects`. An empty slice yields all zeros.
pub fn aggregate(projects: &[Project]) -> DashboardStats {
    let mut stats = DashboardStats::default();
    let mut rd_sum: u64 = 0;

    for project in projects {
        stats.total_projects += 1;
        if project.stage.is_active() {
            stats.active_projects += 1;
        }
        stats.total_budget = stats.total_budget.saturating_add(project.forecast_spend);
        stats.total_actual_spend = stats.total_actual_spend.saturating_add(project.actual_spend);
        *stats.stage_distribution.entry(project.stage).or_insert(0) += 1;
        rd_sum += u64::from(project.eligible_rd);
    }

    if stats.total_projects > 0 {
        stats.avg_rd_percentage = rd_sum as f64 / stats.total_projects as f64;
    }
    stats
}

/// Per-stage spend totals, ordered by stage.
pub fn budget_by_stage(projects: &[Project]) -> Vec<StageBudget> {
    let mut by_stage: BTreeMap<Stage, StageBudget> = BTreeMap::new();
    for project in projects {
        let entry = by_stage.entry(project.stage).or_insert(StageBudget {
            stage: project.stage,
            total_forecast: 0,
            total_actual: 0,
            count: 0,
        });
        entry.total_forecast = entry.total_forecast.saturating_add(project.forecast_spend);
        entry.total_actual = entry.total_actual.saturating_add(project.actual_spend);
        entry.count += 1;
    }
    by_stage.into_values().collect()
}

/// Sum of the credit each project earns at the federal rate.
pub fn total_tax_credit(projects: &[Project]) -> i64 {
    projects
        .iter()
        .map(|p| tax_credit(p.actual_spend, i64::from(p.eligible_rd)))
        .fold(0i64, i64::saturating_add)
}
