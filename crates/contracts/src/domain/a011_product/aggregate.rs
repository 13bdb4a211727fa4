use serde::{Deserialize, Serialize};

/// Catalog entry used for category/brand filtering and COGS.
/// Natural key: `(account_id, asp_id, asin)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub account_id: String,
    pub asp_id: String,
    pub asin: String,
    pub sku: Option<String>,
    pub title: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    /// Landed cost per unit
    pub unit_cost: f64,
}

impl Product {
    pub fn validate(&self) -> Result<(), String> {
        if self.asin.trim().is_empty() {
            return Err("asin is required".into());
        }
        if self.unit_cost < 0.0 {
            return Err("unit_cost must not be negative".into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDto {
    pub asp_id: String,
    pub asin: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub unit_cost: f64,
}
