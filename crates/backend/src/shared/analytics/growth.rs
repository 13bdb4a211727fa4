use contracts::shared::analytics::{ComparedMetric, YearOverYear};

use crate::shared::format::round2;

/// Percentage change of `current` against `prior`.
///
/// A zero prior yields 0 when current is also zero, otherwise `current`
/// itself; dashboards rely on that value being numeric.
pub fn percentage_growth(current: f64, prior: f64) -> f64 {
    if prior != 0.0 {
        round2((current - prior) / prior * 100.0)
    } else if current == 0.0 {
        0.0
    } else {
        current
    }
}

/// How a metric is signed for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// Shown as-is
    Revenue,
    /// Growth on magnitudes, shown as `-|v|`
    Expense,
}

impl MetricKind {
    fn display(&self, value: f64) -> f64 {
        match self {
            MetricKind::Revenue => value,
            MetricKind::Expense => -value.abs(),
        }
    }

    fn growth(&self, current: f64, prior: f64) -> f64 {
        match self {
            MetricKind::Revenue => percentage_growth(current, prior),
            MetricKind::Expense => percentage_growth(current.abs(), prior.abs()),
        }
    }
}

/// Builds the `{current, prior, difference, percentage_growth}` tuple and,
/// when a previous-year value is given, its year-over-year counterpart
pub fn compare(
    kind: MetricKind,
    current: f64,
    prior: f64,
    previous_year: Option<f64>,
) -> ComparedMetric {
    let shown_current = kind.display(current);
    let shown_prior = kind.display(prior);
    ComparedMetric {
        current: round2(shown_current),
        prior: round2(shown_prior),
        difference: round2(shown_current - shown_prior),
        percentage_growth: kind.growth(current, prior),
        previous_year: previous_year.map(|last_year| {
            let shown = kind.display(last_year);
            YearOverYear {
                value: round2(shown),
                difference: round2(shown_current - shown),
                percentage_growth: kind.growth(current, last_year),
            }
        }),
    }
}

pub fn revenue(current: f64, prior: f64, previous_year: Option<f64>) -> ComparedMetric {
    compare(MetricKind::Revenue, current, prior, previous_year)
}

pub fn expense(current: f64, prior: f64, previous_year: Option<f64>) -> ComparedMetric {
    compare(MetricKind::Expense, current, prior, previous_year)
}
