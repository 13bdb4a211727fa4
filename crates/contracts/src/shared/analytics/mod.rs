use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Query string shared by the comparative dashboards.
///
/// `category`, `brand` and `product` are comma-separated lists; an empty or
/// missing value means "no filter".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub asp_id: Option<String>,
    #[serde(default)]
    pub marketplace_id: Option<String>,
    #[serde(default)]
    pub from_date: Option<String>,
    #[serde(default)]
    pub to_date: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub compare_previous_year: Option<bool>,
}

// ---------------------------------------------------------------------------
// Response building blocks
// ---------------------------------------------------------------------------

/// Inclusive date window, both ends formatted `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodDto {
    pub from_date: String,
    pub to_date: String,
}

/// The windows a response was computed over.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonPeriods {
    pub current: PeriodDto,
    pub prior: PeriodDto,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_year: Option<PeriodDto>,
}

/// Same-days-last-year comparison attached to a metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearOverYear {
    pub value: f64,
    pub difference: f64,
    pub percentage_growth: f64,
}

/// One metric compared against the preceding window (and optionally last year).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparedMetric {
    pub current: f64,
    pub prior: f64,
    pub difference: f64,
    pub percentage_growth: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_year: Option<YearOverYear>,
}
