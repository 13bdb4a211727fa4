pub mod lwa;
pub mod retry;

use async_trait::async_trait;
use contracts::domain::a002_seller_connection::aggregate::SellerConnection;
use contracts::domain::a008_amazon_report::aggregate::CreateReportRequest;
use contracts::enums::report_status::ReportStatus;
use thiserror::Error;

use crate::shared::error::ApiError;

/// Failures talking to SP-API, the Ads API or Login with Amazon
#[derive(Error, Debug)]
pub enum AmazonError {
    #[error("http transport: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{api} responded {status}: {body}")]
    Status {
        api: &'static str,
        status: u16,
        body: String,
    },
    #[error("unexpected payload: {0}")]
    Decode(String),
    #[error("seller connection is missing {0}")]
    MissingCredential(&'static str),
}

impl From<AmazonError> for ApiError {
    fn from(err: AmazonError) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

/// Status of a remote report as reported by Amazon
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteReport {
    pub status: ReportStatus,
    /// Report document id (SP-API) or download location (Ads API)
    pub document_id: Option<String>,
}

/// The create / poll / download surface shared by SP-API and Ads API reports
#[async_trait]
pub trait ReportProvider: Send + Sync {
    async fn request_report(
        &self,
        connection: &SellerConnection,
        request: &CreateReportRequest,
    ) -> Result<String, AmazonError>;

    async fn report_status(
        &self,
        connection: &SellerConnection,
        report_id: &str,
    ) -> Result<RemoteReport, AmazonError>;

    /// Downloads the document and returns its decompressed bytes
    async fn download_document(
        &self,
        connection: &SellerConnection,
        document_id: &str,
    ) -> Result<Vec<u8>, AmazonError>;
}

/// Inflates GZIP payloads, passes anything else through
pub fn maybe_gunzip(bytes: Vec<u8>) -> Result<Vec<u8>, AmazonError> {
    use std::io::Read;

    if bytes.len() < 2 || bytes[0] != 0x1f || bytes[1] != 0x8b {
        return Ok(bytes);
    }
    let mut decoder = flate2::read::GzDecoder::new(bytes.as_slice());
    let mut out = Vec::new();
    decoder
        .read_to_end(&mut out)
        .map_err(|e| AmazonError::Decode(format!("gzip: {}", e)))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::{write::GzEncoder, Compression};
    use std::io::Write;

    #[test]
    fn test_maybe_gunzip() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"order-id\tsku\n").unwrap();
        let compressed = encoder.finish().unwrap();

        assert_eq!(maybe_gunzip(compressed).unwrap(), b"order-id\tsku\n".to_vec());
        assert_eq!(maybe_gunzip(b"plain".to_vec()).unwrap(), b"plain".to_vec());
    }

    #[test]
    fn test_upstream_errors_map_to_upstream() {
        let err: ApiError = AmazonError::MissingCredential("ads_refresh_token").into();
        assert!(matches!(err, ApiError::Upstream(_)));
    }
}
