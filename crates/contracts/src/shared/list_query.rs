use serde::{Deserialize, Serialize};

/// Query string of the list endpoints (orders, reports, products, ads profiles).
/// Each endpoint reads the fields it understands.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub asp_id: Option<String>,
    #[serde(default)]
    pub marketplace_id: Option<String>,
    #[serde(default)]
    pub from_date: Option<String>,
    #[serde(default)]
    pub to_date: Option<String>,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
}

impl ListQuery {
    /// `asp_id` with blanks treated as missing
    pub fn asp_id(&self) -> Option<&str> {
        self.asp_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}
