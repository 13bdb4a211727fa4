pub mod d401_sales_overview;
pub mod d402_profit_loss;
pub mod d403_ad_performance;
pub mod d404_marketplace_breakdown;

use contracts::shared::analytics::{ComparedMetric, ComparisonPeriods, DashboardQuery};
use sea_orm::DatabaseConnection;

use crate::shared::analytics::aggregator::{aggregate, MetricFilters, MetricSums, Scope};
use crate::shared::analytics::date_range::DateRange;
use crate::shared::analytics::growth;
use crate::shared::error::ApiError;

/// Validated dashboard request: tenant scope, filters and the windows to compare
#[derive(Debug, Clone)]
pub struct ComparisonWindows {
    pub scope: Scope,
    pub filters: MetricFilters,
    pub current: DateRange,
    pub prior: DateRange,
    pub previous_year: Option<DateRange>,
}

impl ComparisonWindows {
    pub fn resolve(account_id: &str, query: &DashboardQuery) -> Result<Self, ApiError> {
        let asp_id = query
            .asp_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ApiError::field("asp_id", "is required"))?;
        let current = DateRange::parse(query.from_date.as_deref(), query.to_date.as_deref())?;
        let marketplace_id = query
            .marketplace_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(Self {
            scope: Scope {
                account_id: account_id.to_string(),
                asp_id: asp_id.to_string(),
                marketplace_id,
            },
            filters: MetricFilters::from_query(query),
            prior: current.prior(),
            previous_year: query
                .compare_previous_year
                .unwrap_or(false)
                .then(|| current.previous_year()),
            current,
        })
    }

    pub fn periods(&self) -> ComparisonPeriods {
        ComparisonPeriods {
            current: self.current.to_dto(),
            prior: self.prior.to_dto(),
            previous_year: self.previous_year.as_ref().map(DateRange::to_dto),
        }
    }

    /// Runs the aggregator over every window
    pub async fn sums(&self, db: &DatabaseConnection) -> anyhow::Result<WindowSums> {
        let current = aggregate(db, &self.scope, &self.current, &self.filters).await?;
        let prior = aggregate(db, &self.scope, &self.prior, &self.filters).await?;
        let previous_year = match &self.previous_year {
            Some(range) => Some(aggregate(db, &self.scope, range, &self.filters).await?),
            None => None,
        };
        Ok(WindowSums {
            current,
            prior,
            previous_year,
        })
    }
}

#[derive(Debug, Clone)]
pub struct WindowSums {
    pub current: MetricSums,
    pub prior: MetricSums,
    pub previous_year: Option<MetricSums>,
}

impl WindowSums {
    /// Picks one value out of every window
    pub fn pick<F>(&self, f: F) -> (f64, f64, Option<f64>)
    where
        F: Fn(&MetricSums) -> f64,
    {
        (
            f(&self.current),
            f(&self.prior),
            self.previous_year.as_ref().map(&f),
        )
    }

    pub fn revenue<F>(&self, f: F) -> ComparedMetric
    where
        F: Fn(&MetricSums) -> f64,
    {
        let (current, prior, previous_year) = self.pick(f);
        growth::revenue(current, prior, previous_year)
    }

    pub fn expense<F>(&self, f: F) -> ComparedMetric
    where
        F: Fn(&MetricSums) -> f64,
    {
        let (current, prior, previous_year) = self.pick(f);
        growth::expense(current, prior, previous_year)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use contracts::shared::analytics::DashboardQuery;

    use crate::shared::analytics::aggregator::fixtures::SELLER;

    /// 2023-06-16..20 against 2023-06-11..15
    pub fn june_query() -> DashboardQuery {
        DashboardQuery {
            asp_id: Some(SELLER.into()),
            from_date: Some("2023-06-16".into()),
            to_date: Some("2023-06-20".into()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::june_query;
    use super::*;

    #[test]
    fn test_resolve_requires_asp_id() {
        let query = DashboardQuery {
            asp_id: Some("  ".into()),
            ..june_query()
        };
        match ComparisonWindows::resolve("acc-1", &query) {
            Err(ApiError::Validation(errors)) => assert!(errors.contains_key("asp_id")),
            other => panic!("unexpected: {:?}", other.map(|w| w.scope)),
        }
    }

    #[test]
    fn test_resolve_builds_windows() {
        let query = DashboardQuery {
            compare_previous_year: Some(true),
            marketplace_id: Some(String::new()),
            ..june_query()
        };
        let windows = ComparisonWindows::resolve("acc-1", &query).unwrap();
        let periods = windows.periods();

        assert_eq!(windows.scope.marketplace_id, None);
        assert_eq!(periods.prior.from_date, "2023-06-11");
        assert_eq!(periods.prior.to_date, "2023-06-15");
        assert_eq!(
            periods.previous_year.map(|p| p.from_date),
            Some("2022-06-16".to_string())
        );
    }

    #[test]
    fn test_previous_year_is_opt_in() {
        let windows = ComparisonWindows::resolve("acc-1", &june_query()).unwrap();
        assert!(windows.previous_year.is_none());
        assert!(windows.periods().previous_year.is_none());
    }
}
