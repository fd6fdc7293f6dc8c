use axum::Json;
use axum::extract::State;

use crate::analytics::{DashboardStats, StageBudget};
use crate::db::stats as stats_db;

use super::{ApiError, AppState};

pub(super) async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardStats>, ApiError> {
    Ok(Json(stats_db::dashboard_totals(&*state.db()?)?))
}

pub(super) async fn budget(State(state): State<AppState>) -> Result<Json<Vec<StageBudget>>, ApiError> {
    Ok(Json(stats_db::budget_by_stage(&*state.db()?)?))
}
