use serde::{Deserialize, Serialize};

/// Which Amazon API a report is requested from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportSource {
    SpApi,
    Ads,
}

impl ReportSource {
    pub fn code(&self) -> &'static str {
        match self {
            ReportSource::SpApi => "SP_API",
            ReportSource::Ads => "ADS",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "SP_API" => Some(ReportSource::SpApi),
            "ADS" => Some(ReportSource::Ads),
            _ => None,
        }
    }
}

/// Sponsored ads product line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdProduct {
    SponsoredBrands,
    SponsoredProducts,
    SponsoredDisplay,
}

impl AdProduct {
    pub fn code(&self) -> &'static str {
        match self {
            AdProduct::SponsoredBrands => "SPONSORED_BRANDS",
            AdProduct::SponsoredProducts => "SPONSORED_PRODUCTS",
            AdProduct::SponsoredDisplay => "SPONSORED_DISPLAY",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "SPONSORED_BRANDS" => Some(AdProduct::SponsoredBrands),
            "SPONSORED_PRODUCTS" => Some(AdProduct::SponsoredProducts),
            "SPONSORED_DISPLAY" => Some(AdProduct::SponsoredDisplay),
            _ => None,
        }
    }
}

/// Reports the backend knows how to request and ingest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportType {
    AllOrders,
    SettlementV2,
    SalesAndTraffic,
    FbaCustomerReturns,
    FbaReimbursements,
    SponsoredProducts,
    SponsoredBrands,
    SponsoredDisplay,
}

impl ReportType {
    /// Report type identifier sent to Amazon
    pub fn amazon_code(&self) -> &'static str {
        match self {
            ReportType::AllOrders => "GET_FLAT_FILE_ALL_ORDERS_DATA_BY_ORDER_DATE_GENERAL",
            ReportType::SettlementV2 => "GET_V2_SETTLEMENT_REPORT_DATA_FLAT_FILE_V2",
            ReportType::SalesAndTraffic => "GET_SALES_AND_TRAFFIC_REPORT",
            ReportType::FbaCustomerReturns => "GET_FBA_FULFILLMENT_CUSTOMER_RETURNS_DATA",
            ReportType::FbaReimbursements => "GET_FBA_REIMBURSEMENTS_DATA",
            ReportType::SponsoredProducts => "spAdvertisedProduct",
            ReportType::SponsoredBrands => "sbCampaigns",
            ReportType::SponsoredDisplay => "sdAdvertisedProduct",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ReportType::AllOrders => "ALL_ORDERS",
            ReportType::SettlementV2 => "SETTLEMENT_V2",
            ReportType::SalesAndTraffic => "SALES_AND_TRAFFIC",
            ReportType::FbaCustomerReturns => "FBA_CUSTOMER_RETURNS",
            ReportType::FbaReimbursements => "FBA_REIMBURSEMENTS",
            ReportType::SponsoredProducts => "SPONSORED_PRODUCTS",
            ReportType::SponsoredBrands => "SPONSORED_BRANDS",
            ReportType::SponsoredDisplay => "SPONSORED_DISPLAY",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().into_iter().find(|t| t.code() == code)
    }

    pub fn all() -> Vec<ReportType> {
        vec![
            ReportType::AllOrders,
            ReportType::SettlementV2,
            ReportType::SalesAndTraffic,
            ReportType::FbaCustomerReturns,
            ReportType::FbaReimbursements,
            ReportType::SponsoredProducts,
            ReportType::SponsoredBrands,
            ReportType::SponsoredDisplay,
        ]
    }

    pub fn source(&self) -> ReportSource {
        match self {
            ReportType::SponsoredProducts
            | ReportType::SponsoredBrands
            | ReportType::SponsoredDisplay => ReportSource::Ads,
            _ => ReportSource::SpApi,
        }
    }

    pub fn ad_product(&self) -> Option<AdProduct> {
        match self {
            ReportType::SponsoredProducts => Some(AdProduct::SponsoredProducts),
            ReportType::SponsoredBrands => Some(AdProduct::SponsoredBrands),
            ReportType::SponsoredDisplay => Some(AdProduct::SponsoredDisplay),
            _ => None,
        }
    }

    /// Flat-file reports are tab separated, the rest are JSON documents
    pub fn is_flat_file(&self) -> bool {
        matches!(
            self,
            ReportType::AllOrders
                | ReportType::SettlementV2
                | ReportType::FbaCustomerReturns
                | ReportType::FbaReimbursements
        )
    }
}

impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
