use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enums::report_status::ReportStatus;
use crate::enums::report_type::{ReportSource, ReportType};

/// Tracks one report requested from Amazon through create / verify / retrieve.
///
/// `document_id` is only ever set once the report reached `DONE`. For Ads API
/// reports it holds the download location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmazonReport {
    pub id: String,
    pub account_id: String,
    pub asp_id: String,
    pub marketplace_id: String,
    pub source: ReportSource,
    pub report_type: ReportType,
    /// Id assigned by Amazon
    pub report_id: String,
    pub status: ReportStatus,
    pub document_id: Option<String>,
    pub data_start_date: NaiveDate,
    pub data_end_date: NaiveDate,
    pub rows_ingested: i64,
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AmazonReport {
    pub fn new_for_insert(
        account_id: String,
        request: &CreateReportRequest,
        report_id: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            account_id,
            asp_id: request.asp_id.clone(),
            marketplace_id: request.marketplace_id.clone(),
            source: request.report_type.source(),
            report_type: request.report_type,
            report_id,
            status: ReportStatus::New,
            document_id: None,
            data_start_date: request.data_start_date,
            data_end_date: request.data_end_date,
            rows_ingested: 0,
            processed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a polled status. Terminal reports are frozen.
    pub fn apply_status(
        &mut self,
        status: ReportStatus,
        document_id: Option<String>,
    ) -> Result<(), String> {
        if self.status.is_terminal() && status != self.status {
            return Err(format!(
                "report {} is already {} and cannot move to {}",
                self.report_id, self.status, status
            ));
        }
        match status {
            ReportStatus::Done => {
                let document_id = document_id
                    .filter(|d| !d.trim().is_empty())
                    .or_else(|| self.document_id.clone())
                    .ok_or_else(|| format!("report {} is DONE without a document", self.report_id))?;
                self.document_id = Some(document_id);
            }
            _ => self.document_id = None,
        }
        self.status = status;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn mark_processed(&mut self, rows_ingested: i64) {
        let now = Utc::now();
        self.rows_ingested = rows_ingested;
        self.processed_at = Some(now);
        self.updated_at = now;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReportRequest {
    pub asp_id: String,
    pub marketplace_id: String,
    pub report_type: ReportType,
    pub data_start_date: NaiveDate,
    pub data_end_date: NaiveDate,
}

impl CreateReportRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.asp_id.trim().is_empty() {
            return Err("asp_id is required".into());
        }
        if self.data_start_date > self.data_end_date {
            return Err("data_start_date must not be after data_end_date".into());
        }
        Ok(())
    }
}
