//! Gantt layout for a page of projects.
//!
//! Everything here is a pure function of `(records, now)`: the window is
//! month-aligned around the records, bars are placed as fractions of that
//! window, and milestones fall at fixed fractions of it.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use crate::models::{Project, Stage};

pub const DEFAULT_PAGE_SIZE: usize = 5;

const MILESTONES: [(&str, f64); 3] = [
    ("Q1 Review", 0.25),
    ("Mid-Year Check", 0.50),
    ("Q3 Review", 0.75),
];
const FINAL_MILESTONE: &str = "Year End";

/// Instant at which a calendar date begins (midnight UTC).
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    start_of_month(date)
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

/// Share of `[start, end]` elapsed at `now`, in `0.0..=1.0`.
///
/// A zero-length schedule flips from 0 to 1 at its start instant.
pub fn elapsed_fraction(start: NaiveDate, end: NaiveDate, now: DateTime<Utc>) -> f64 {
    let (start, end) = (start_of_day(start), start_of_day(end));
    if now < start {
        return 0.0;
    }
    if now >= end {
        return 1.0;
    }
    let total = (end - start).num_milliseconds() as f64;
    let elapsed = (now - start).num_milliseconds() as f64;
    (elapsed / total).clamp(0.0, 1.0)
}

/// Completion percentage rounded to the nearest whole number.
pub fn progress(start: NaiveDate, end: NaiveDate, now: DateTime<Utc>) -> u8 {
    (elapsed_fraction(start, end, now) * 100.0).round() as u8
}

pub fn is_overdue(end: NaiveDate, stage: Stage, now: DateTime<Utc>) -> bool {
    stage != Stage::Completed && now > start_of_day(end)
}

/// Month-aligned date range covering every record on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Inclusive of both endpoints.
    pub total_days: i64,
}

impl TimelineWindow {
    /// An empty input yields the calendar month containing `now`.
    pub fn covering(records: &[Project], now: DateTime<Utc>) -> Self {
        let dates = records.iter().flat_map(|p| [p.start_date, p.end_date]);
        let (min, max) = dates.fold(None, |acc: Option<(NaiveDate, NaiveDate)>, d| match acc {
            None => Some((d, d)),
            Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
        })
        .unwrap_or_else(|| {
            let today = now.date_naive();
            (today, today)
        });

        let start = start_of_month(min);
        let end = end_of_month(max);
        Self {
            start,
            end,
            total_days: (end - start).num_days() + 1,
        }
    }

    pub fn offset_of(&self, date: NaiveDate) -> i64 {
        (date - self.start).num_days()
    }

    pub fn fraction_of(&self, days: i64) -> f64 {
        days as f64 / self.total_days as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub label: &'static str,
    pub date: NaiveDate,
    pub offset_days: i64,
    pub position: f64,
}

/// Markers at a quarter, half and three quarters of the window, then its end.
pub fn milestones(window: &TimelineWindow) -> Vec<Milestone> {
    let mut marks: Vec<(&'static str, i64)> = MILESTONES
        .iter()
        .map(|&(label, fraction)| (label, (window.total_days as f64 * fraction).floor() as i64))
        .collect();
    marks.push((FINAL_MILESTONE, window.total_days - 1));

    marks
        .into_iter()
        .map(|(label, offset_days)| Milestone {
            label,
            date: window.start + Days::new(offset_days.max(0) as u64),
            offset_days,
            position: window.fraction_of(offset_days),
        })
        .collect()
}

/// Placement and status of one record on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bar {
    #[serde(rename = "_id")]
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub stage: Stage,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Inclusive day count; 0 when the end precedes the start.
    pub span_days: i64,
    pub left: f64,
    pub width: f64,
    pub progress: u8,
    pub overdue: bool,
}

impl Bar {
    fn place(project: &Project, window: &TimelineWindow, now: DateTime<Utc>) -> Self {
        let days = (project.end_date - project.start_date).num_days();
        let span_days = if days < 0 { 0 } else { days + 1 };
        Self {
            id: project.id.clone(),
            project_id: project.project_id.clone(),
            name: project.name.clone(),
            stage: project.stage,
            start_date: project.start_date,
            end_date: project.end_date,
            span_days,
            left: window.fraction_of(window.offset_of(project.start_date)),
            width: window.fraction_of(span_days),
            progress: progress(project.start_date, project.end_date, now),
            overdue: is_overdue(project.end_date, project.stage, now),
        }
    }
}

/// Indices into [`TimelineLayout::bars`] sharing a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageGroup {
    pub stage: Stage,
    pub members: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineLayout {
    pub window: TimelineWindow,
    pub milestones: Vec<Milestone>,
    pub bars: Vec<Bar>,
    /// Ordered by each stage's first appearance in the input.
    pub groups: Vec<StageGroup>,
}

pub fn layout(records: &[Project], now: DateTime<Utc>) -> TimelineLayout {
    let window = TimelineWindow::covering(records, now);
    let bars: Vec<Bar> = records
        .iter()
        .map(|p| Bar::place(p, &window, now))
        .collect();

    let mut groups: Vec<StageGroup> = Vec::new();
    for (idx, bar) in bars.iter().enumerate() {
        match groups.iter_mut().find(|g| g.stage == bar.stage) {
            Some(group) => group.members.push(idx),
            None => groups.push(StageGroup {
                stage: bar.stage,
                members: vec![idx],
            }),
        }
    }

    TimelineLayout {
        milestones: milestones(&window),
        window,
        bars,
        groups,
    }
}

/// Schedule health across a whole portfolio.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineSummary {
    pub total: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub upcoming: usize,
    /// At least half elapsed and not yet completed.
    pub on_track: usize,
    pub overdue: usize,
    pub average_progress: f64,
}

pub fn summarize(records: &[Project], now: DateTime<Utc>) -> TimelineSummary {
    let mut summary = TimelineSummary::default();
    let mut progress_sum: u64 = 0;

    for p in records {
        let pct = progress(p.start_date, p.end_date, now);
        summary.total += 1;
        progress_sum += u64::from(pct);
        match p.stage {
            Stage::InProgress => summary.in_progress += 1,
            Stage::Completed => summary.completed += 1,
            _ => {}
        }
        if start_of_day(p.start_date) > now {
            summary.upcoming += 1;
        }
        if pct >= 50 && p.stage != Stage::Completed {
            summary.on_track += 1;
        }
        if is_overdue(p.end_date, p.stage, now) {
            summary.overdue += 1;
        }
    }

    if summary.total > 0 {
        summary.average_progress = progress_sum as f64 / summary.total as f64;
    }
    summary
}

/// One page of an ordered record list. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page<'a> {
    pub items: &'a [Project],
    pub page: usize,
    pub per_page: usize,
    pub page_count: usize,
    pub total: usize,
}

pub fn paginate(records: &[Project], page: usize, per_page: usize) -> Page<'_> {
    let per_page = if per_page == 0 { DEFAULT_PAGE_SIZE } else { per_page };
    let page = page.max(1);
    let total = records.len();
    let start = (page - 1).saturating_mul(per_page).min(total);
    let end = start.saturating_add(per_page).min(total);

    Page {
        items: &records[start..end],
        page,
        per_page,
        page_count: total.div_ceil(per_page),
        total,
    }
}
