use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestSummary {
    pub rows_ingested: i64,
    pub rows_skipped: i64,
}
