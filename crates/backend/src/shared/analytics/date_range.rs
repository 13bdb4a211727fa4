use chrono::{Duration, Months, NaiveDate};
use contracts::shared::analytics::PeriodDto;
use std::collections::BTreeMap;

use crate::shared::error::ApiError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive window of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// Parses `from_date` / `to_date` query values, reporting every bad field
    pub fn parse(from_date: Option<&str>, to_date: Option<&str>) -> Result<Self, ApiError> {
        let mut errors = BTreeMap::new();
        let from = parse_field("from_date", from_date, &mut errors);
        let to = parse_field("to_date", to_date, &mut errors);

        match (from, to) {
            (Some(from), Some(to)) if from <= to => Ok(Self { from, to }),
            (Some(_), Some(_)) => {
                errors.insert(
                    "from_date".to_string(),
                    "must not be after to_date".to_string(),
                );
                Err(ApiError::Validation(errors))
            }
            _ => Err(ApiError::Validation(errors)),
        }
    }

    /// Number of days in the window, both ends included
    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }

    /// The equal-length window ending the day before `from`
    pub fn prior(&self) -> DateRange {
        let (from, to) = prior_range(self.from, self.to);
        DateRange { from, to }
    }

    /// Same calendar days one year earlier
    pub fn previous_year(&self) -> DateRange {
        let (from, to) = previous_year_range(self.from, self.to);
        DateRange { from, to }
    }

    pub fn start_str(&self) -> String {
        self.from.format(DATE_FORMAT).to_string()
    }

    pub fn end_str(&self) -> String {
        self.to.format(DATE_FORMAT).to_string()
    }

    pub fn to_dto(&self) -> PeriodDto {
        PeriodDto {
            from_date: self.start_str(),
            to_date: self.end_str(),
        }
    }
}

fn parse_field(
    name: &str,
    value: Option<&str>,
    errors: &mut BTreeMap<String, String>,
) -> Option<NaiveDate> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => {
            errors.insert(name.to_string(), "is required".to_string());
            None
        }
        Some(raw) => match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
            Ok(date) => Some(date),
            Err(_) => {
                errors.insert(name.to_string(), format!("expected YYYY-MM-DD, got {}", raw));
                None
            }
        },
    }
}

pub fn prior_range(from: NaiveDate, to: NaiveDate) -> (NaiveDate, NaiveDate) {
    let length = (to - from).num_days() + 1;
    let prior_to = from - Duration::days(1);
    let prior_from = prior_to - Duration::days(length - 1);
    (prior_from, prior_to)
}

/// Calendar-year shift; Feb 29 lands on Feb 28
pub fn previous_year_range(from: NaiveDate, to: NaiveDate) -> (NaiveDate, NaiveDate) {
    (minus_one_year(from), minus_one_year(to))
}

fn minus_one_year(date: NaiveDate) -> NaiveDate {
    date.checked_sub_months(Months::new(12)).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_prior_range_is_contiguous_and_equal_length() {
        assert_eq!(
            prior_range(d(2023, 6, 16), d(2023, 6, 20)),
            (d(2023, 6, 11), d(2023, 6, 15))
        );
        assert_eq!(
            prior_range(d(2023, 3, 1), d(2023, 3, 1)),
            (d(2023, 2, 28), d(2023, 2, 28))
        );
        let range = DateRange::new(d(2023, 1, 1), d(2023, 1, 31));
        assert_eq!(range.prior().days(), 31);
        assert_eq!(range.prior().to, d(2022, 12, 31));
    }

    #[test]
    fn test_previous_year_range() {
        assert_eq!(
            previous_year_range(d(2023, 6, 16), d(2023, 6, 20)),
            (d(2022, 6, 16), d(2022, 6, 20))
        );
        assert_eq!(
            previous_year_range(d(2024, 2, 1), d(2024, 2, 29)),
            (d(2023, 2, 1), d(2023, 2, 28))
        );
    }

    #[test]
    fn test_parse_reports_bad_fields() {
        let err = DateRange::parse(Some("2023-13-01"), None).unwrap_err();
        match err {
            ApiError::Validation(errors) => {
                assert!(errors.contains_key("from_date"));
                assert!(errors.contains_key("to_date"));
            }
            other => panic!("unexpected {:?}", other),
        }

        let err = DateRange::parse(Some("2023-06-20"), Some("2023-06-16")).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let range = DateRange::parse(Some("2023-06-16"), Some(" 2023-06-20 ")).unwrap();
        assert_eq!(range.days(), 5);
        assert_eq!(range.to_dto().from_date, "2023-06-16");
    }
}
