use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::timeline::{self, TimelineLayout, TimelineSummary};
use crate::db::project as project_db;
use crate::models::project::iso_date;

use super::{ApiError, AppState};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct TimelineParams {
    page: Option<usize>,
    per_page: Option<usize>,
    /// Overrides the wall clock, as RFC 3339 or `YYYY-MM-DD`.
    now: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct TimelinePage {
    page: usize,
    per_page: usize,
    page_count: usize,
    total: usize,
    summary: TimelineSummary,
    layout: TimelineLayout,
}

/// Accepts RFC 3339 or a bare date. An unencoded `+` in the offset reaches
/// us as a space after query decoding, so `T00:00:00 02:00` reads as `+02:00`.
fn parse_now(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.to_utc());
    }
    if let Some((head, offset)) = raw.rsplit_once(' ')
        && let Ok(dt) = DateTime::parse_from_rfc3339(&format!("{head}+{offset}"))
    {
        return Ok(dt.to_utc());
    }
    iso_date::parse(raw)
        .map(timeline::start_of_day)
        .ok_or_else(|| ApiError::Validation(format!("invalid now: {raw}")))
}

/// One page of the Gantt layout. The summary covers every record; the window
/// and bars cover only the records on the requested page.
pub(super) async fn page(
    State(state): State<AppState>,
    params: Result<Query<TimelineParams>, QueryRejection>,
) -> Result<Json<TimelinePage>, ApiError> {
    let Query(params) = params?;
    let now = match params.now.as_deref() {
        Some(raw) => parse_now(raw)?,
        None => Utc::now(),
    };

    let projects = project_db::list_projects(&*state.db()?, None)?;
    let page = timeline::paginate(
        &projects,
        params.page.unwrap_or(1),
        params.per_page.unwrap_or(state.page_size),
    );

    Ok(Json(TimelinePage {
        page: page.page,
        per_page: page.per_page,
        page_count: page.page_count,
        total: page.total,
        summary: timeline::summarize(&projects, now),
        layout: timeline::layout(page.items, now),
    }))
}
