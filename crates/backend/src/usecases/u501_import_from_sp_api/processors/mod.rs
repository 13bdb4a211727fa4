pub mod financial_events;
pub mod fba_returns;
pub mod orders;
pub mod reimbursements;
pub mod sales_traffic;
pub mod settlements;

use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::collections::HashMap;

use crate::shared::format::parse_amount;

/// One row of a tab-separated report, keyed by lower-cased header
pub struct FlatRow(HashMap<String, String>);

impl FlatRow {
    /// Trimmed value, `None` when the column is absent or blank
    pub fn get(&self, column: &str) -> Option<&str> {
        self.0
            .get(column)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn text(&self, column: &str) -> String {
        self.get(column).unwrap_or_default().to_string()
    }

    pub fn opt(&self, column: &str) -> Option<String> {
        self.get(column).map(str::to_string)
    }

    pub fn amount(&self, column: &str) -> f64 {
        self.get(column).map(parse_amount).unwrap_or(0.0)
    }

    pub fn count(&self, column: &str) -> i64 {
        self.get(column)
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(0)
    }
}

/// Parses a flat-file report. Amazon documents are not always valid UTF-8
/// (EU settlements), so bytes are decoded lossily.
pub fn read_flat_file(bytes: &[u8]) -> Result<Vec<FlatRow>> {
    let text = String::from_utf8_lossy(bytes);
    let text = text.trim_start_matches('\u{feff}');
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .quoting(false)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row = headers
            .iter()
            .cloned()
            .zip(record.iter().map(str::to_string))
            .collect();
        rows.push(FlatRow(row));
    }
    Ok(rows)
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS UTC`, `YYYY-MM-DD` and `DD.MM.YYYY`
pub fn parse_report_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    let without_zone = value.trim_end_matches(" UTC").trim_end_matches(" PST").trim();
    if let Ok(naive) = NaiveDateTime::parse_from_str(without_zone, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    parse_report_date(value).and_then(|d| d.and_hms_opt(0, 0, 0).map(|n| n.and_utc()))
}

pub fn parse_report_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let head = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(head, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(head, "%d.%m.%Y"))
        .ok()
}

#[cfg(test)]
pub(crate) fn test_report(
    report_type: contracts::enums::report_type::ReportType,
) -> contracts::domain::a008_amazon_report::aggregate::AmazonReport {
    use contracts::domain::a008_amazon_report::aggregate::{AmazonReport, CreateReportRequest};

    let request = CreateReportRequest {
        asp_id: "A1SELLER".into(),
        marketplace_id: "ATVPDKIKX0DER".into(),
        report_type,
        data_start_date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
        data_end_date: NaiveDate::from_ymd_opt(2023, 6, 30).unwrap(),
    };
    AmazonReport::new_for_insert("acc-1".into(), &request, "R1".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_flat_file_normalizes_headers() {
        let rows = read_flat_file(b"\xef\xbb\xbfOrder-Id\tAmount\n111-1\t1,234.50\n111-2\t\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("order-id"), Some("111-1"));
        assert_eq!(rows[0].amount("amount"), 1234.5);
        assert_eq!(rows[1].get("amount"), None);
        assert_eq!(rows[1].amount("amount"), 0.0);
    }

    #[test]
    fn test_read_flat_file_decimal_comma_amounts() {
        let rows = read_flat_file(b"amount\n-6,00\n1.234,50\n").unwrap();
        assert_eq!(rows[0].amount("amount"), -6.0);
        assert_eq!(rows[1].amount("amount"), 1234.5);
    }

    #[test]
    fn test_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2023, 6, 10).unwrap();
        assert_eq!(parse_report_date("2023-06-10"), Some(expected));
        assert_eq!(parse_report_date("10.06.2023"), Some(expected));
        assert_eq!(parse_report_date("2023-06-10T12:30:00+00:00"), Some(expected));
        assert_eq!(parse_report_date("garbage"), None);

        let dt = parse_report_datetime("2023-06-10 07:15:00 UTC").unwrap();
        assert_eq!(dt.date_naive(), expected);
        assert!(parse_report_datetime("2023-06-10T07:15:00-07:00").is_some());
    }
}
