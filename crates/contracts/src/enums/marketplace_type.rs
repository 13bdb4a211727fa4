use serde::{Deserialize, Serialize};

/// SP-API regional endpoint group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmazonRegion {
    Na,
    Eu,
    Fe,
}

impl AmazonRegion {
    pub fn sp_api_host(&self) -> &'static str {
        match self {
            AmazonRegion::Na => "https://sellingpartnerapi-na.amazon.com",
            AmazonRegion::Eu => "https://sellingpartnerapi-eu.amazon.com",
            AmazonRegion::Fe => "https://sellingpartnerapi-fe.amazon.com",
        }
    }

    pub fn ads_api_host(&self) -> &'static str {
        match self {
            AmazonRegion::Na => "https://advertising-api.amazon.com",
            AmazonRegion::Eu => "https://advertising-api-eu.amazon.com",
            AmazonRegion::Fe => "https://advertising-api-fe.amazon.com",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AmazonRegion::Na => "na",
            AmazonRegion::Eu => "eu",
            AmazonRegion::Fe => "fe",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "na" => Some(AmazonRegion::Na),
            "eu" => Some(AmazonRegion::Eu),
            "fe" => Some(AmazonRegion::Fe),
            _ => None,
        }
    }
}

/// Amazon marketplaces supported by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketplaceType {
    UnitedStates,
    Canada,
    Mexico,
    UnitedKingdom,
    Germany,
    France,
    Italy,
    Spain,
    India,
    Japan,
}

impl MarketplaceType {
    /// Amazon marketplace id
    pub fn code(&self) -> &'static str {
        match self {
            MarketplaceType::UnitedStates => "ATVPDKIKX0DER",
            MarketplaceType::Canada => "A2EUQ1WTGCTBG2",
            MarketplaceType::Mexico => "A1AM78C64UM0Y8",
            MarketplaceType::UnitedKingdom => "A1F83G8C2ARO7P",
            MarketplaceType::Germany => "A1PA6795UKMFR9",
            MarketplaceType::France => "A13V1IB3VIYZZH",
            MarketplaceType::Italy => "APJ6JRA9NG5V4",
            MarketplaceType::Spain => "A1RKKUPIHCS9HS",
            MarketplaceType::India => "A21TJRUUN4KGV",
            MarketplaceType::Japan => "A1VC38T7YXB528",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            MarketplaceType::UnitedStates => "Amazon.com",
            MarketplaceType::Canada => "Amazon.ca",
            MarketplaceType::Mexico => "Amazon.com.mx",
            MarketplaceType::UnitedKingdom => "Amazon.co.uk",
            MarketplaceType::Germany => "Amazon.de",
            MarketplaceType::France => "Amazon.fr",
            MarketplaceType::Italy => "Amazon.it",
            MarketplaceType::Spain => "Amazon.es",
            MarketplaceType::India => "Amazon.in",
            MarketplaceType::Japan => "Amazon.co.jp",
        }
    }

    pub fn currency(&self) -> &'static str {
        match self {
            MarketplaceType::UnitedStates => "USD",
            MarketplaceType::Canada => "CAD",
            MarketplaceType::Mexico => "MXN",
            MarketplaceType::UnitedKingdom => "GBP",
            MarketplaceType::Germany
            | MarketplaceType::France
            | MarketplaceType::Italy
            | MarketplaceType::Spain => "EUR",
            MarketplaceType::India => "INR",
            MarketplaceType::Japan => "JPY",
        }
    }

    pub fn region(&self) -> AmazonRegion {
        match self {
            MarketplaceType::UnitedStates | MarketplaceType::Canada | MarketplaceType::Mexico => {
                AmazonRegion::Na
            }
            MarketplaceType::Japan => AmazonRegion::Fe,
            _ => AmazonRegion::Eu,
        }
    }

    pub fn all() -> Vec<MarketplaceType> {
        vec![
            MarketplaceType::UnitedStates,
            MarketplaceType::Canada,
            MarketplaceType::Mexico,
            MarketplaceType::UnitedKingdom,
            MarketplaceType::Germany,
            MarketplaceType::France,
            MarketplaceType::Italy,
            MarketplaceType::Spain,
            MarketplaceType::India,
            MarketplaceType::Japan,
        ]
    }

    /// Parse from an Amazon marketplace id
    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().into_iter().find(|m| m.code() == code)
    }
}

impl std::fmt::Display for MarketplaceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
