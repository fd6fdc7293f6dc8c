use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analytics::timeline;
use crate::models::Stage;

/// Performance/power/area target triple. Each entry is a free-text delta such
/// as `+10% Perf`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PpaTarget {
    pub performance: String,
    pub power: String,
    pub area: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: String,
    pub project_id: String,
    #[serde(alias = "projectName")]
    pub name: String,
    #[serde(with = "iso_date")]
    pub start_date: NaiveDate,
    #[serde(with = "iso_date")]
    pub end_date: NaiveDate,
    pub stage: Stage,
    pub resource_allocated: f64,
    pub ppa_target: PpaTarget,
    #[serde(rename = "eligibleRD")]
    pub eligible_rd: u8,
    pub actual_spend: i64,
    pub forecast_spend: i64,
    pub tax_credit_eligible: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl Project {
    /// Calendar days between start and end (exclusive of the end day).
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    /// Unrounded share of the schedule elapsed at `now`, clamped to 0..=100.
    pub fn completion_percentage(&self, now: DateTime<Utc>) -> f64 {
        timeline::elapsed_fraction(self.start_date, self.end_date, now) * 100.0
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        timeline::is_overdue(self.end_date, self.stage, now)
    }
}

/// Body of a create request. A client-supplied `taxCreditEligible` is ignored:
/// the store derives it from spend and R&D share.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectInput {
    pub project_id: String,
    #[serde(alias = "projectName")]
    pub name: String,
    #[serde(with = "iso_date")]
    pub start_date: NaiveDate,
    #[serde(with = "iso_date")]
    pub end_date: NaiveDate,
    pub stage: Stage,
    pub resource_allocated: f64,
    pub ppa_target: PpaTarget,
    #[serde(rename = "eligibleRD")]
    pub eligible_rd: u8,
    pub actual_spend: i64,
    pub forecast_spend: i64,
}

/// Partial update. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectInput {
    pub project_id: Option<String>,
    #[serde(alias = "projectName")]
    pub name: Option<String>,
    #[serde(default, with = "iso_date::option")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, with = "iso_date::option")]
    pub end_date: Option<NaiveDate>,
    pub stage: Option<Stage>,
    pub resource_allocated: Option<f64>,
    pub ppa_target: Option<PpaTarget>,
    #[serde(rename = "eligibleRD")]
    pub eligible_rd: Option<u8>,
    pub actual_spend: Option<i64>,
    pub forecast_spend: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("endDate ({end}) must not be before startDate ({start})")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    #[error("{0} must not be negative")]
    Negative(&'static str),
    #[error("{0} must not exceed {max}", max = MAX_SPEND)]
    TooLarge(&'static str),
    #[error("eligibleRD must be between 0 and 100, got {0}")]
    PercentOutOfRange(u8),
}

/// Ceiling for `actualSpend` and `forecastSpend`. Keeps portfolio sums well
/// inside `i64` for any table this store will hold.
pub const MAX_SPEND: i64 = 1_000_000_000_000_000;

impl CreateProjectInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let required = [
            ("projectId", &self.project_id),
            ("name", &self.name),
            ("ppaTarget.performance", &self.ppa_target.performance),
            ("ppaTarget.power", &self.ppa_target.power),
            ("ppaTarget.area", &self.ppa_target.area),
        ];
        if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(ValidationError::MissingField(*field));
        }

        if self.end_date < self.start_date {
            return Err(ValidationError::EndBeforeStart {
                start: self.start_date,
                end: self.end_date,
            });
        }
        // `!(x >= 0.0)` also rejects NaN.
        if !(self.resource_allocated >= 0.0) {
            return Err(ValidationError::Negative("resourceAllocated"));
        }
        if self.eligible_rd > 100 {
            return Err(ValidationError::PercentOutOfRange(self.eligible_rd));
        }
        if self.actual_spend < 0 {
            return Err(ValidationError::Negative("actualSpend"));
        }
        if self.forecast_spend < 0 {
            return Err(ValidationError::Negative("forecastSpend"));
        }
        if self.actual_spend > MAX_SPEND {
            return Err(ValidationError::TooLarge("actualSpend"));
        }
        if self.forecast_spend > MAX_SPEND {
            return Err(ValidationError::TooLarge("forecastSpend"));
        }
        Ok(())
    }

    /// Overlay a partial update onto this input.
    pub fn apply(mut self, patch: UpdateProjectInput) -> Self {
        if let Some(v) = patch.project_id {
            self.project_id = v;
        }
        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.start_date {
            self.start_date = v;
        }
        if let Some(v) = patch.end_date {
            self.end_date = v;
        }
        if let Some(v) = patch.stage {
            self.stage = v;
        }
        if let Some(v) = patch.resource_allocated {
            self.resource_allocated = v;
        }
        if let Some(v) = patch.ppa_target {
            self.ppa_target = v;
        }
        if let Some(v) = patch.eligible_rd {
            self.eligible_rd = v;
        }
        if let Some(v) = patch.actual_spend {
            self.actual_spend = v;
        }
        if let Some(v) = patch.forecast_spend {
            self.forecast_spend = v;
        }
        self
    }
}

impl From<&Project> for CreateProjectInput {
    fn from(p: &Project) -> Self {
        Self {
            project_id: p.project_id.clone(),
            name: p.name.clone(),
            start_date: p.start_date,
            end_date: p.end_date,
            stage: p.stage,
            resource_allocated: p.resource_allocated,
            ppa_target: p.ppa_target.clone(),
            eligible_rd: p.eligible_rd,
            actual_spend: p.actual_spend,
            forecast_spend: p.forecast_spend,
        }
    }
}

/// Dates travel as `YYYY-MM-DD`. RFC 3339 timestamps are accepted on input
/// and truncated to their UTC date.
pub(crate) mod iso_date {
    use chrono::{DateTime, NaiveDate};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn parse(s: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(s, FORMAT)
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.to_utc().date_naive()))
    }

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}")))
    }

    pub mod option {
        use chrono::NaiveDate;
        use serde::{Deserialize, Deserializer};

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDate>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(raw) => super::parse(&raw)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {raw}"))),
                None => Ok(None),
            }
        }
    }
}
