use serde::{Deserialize, Serialize};

/// One Amazon order. Natural key: `(selling_partner_id, amazon_order_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub account_id: String,
    pub selling_partner_id: String,
    pub marketplace_id: String,
    pub amazon_order_id: String,
    pub order_status: String,
    pub order_total: f64,
    pub currency: Option<String>,
    pub sales_channel: Option<String>,
    pub fulfillment_channel: Option<String>,
    pub ship_city: Option<String>,
    pub ship_state: Option<String>,
    pub ship_postal_code: Option<String>,
    pub ship_country: Option<String>,
    /// RFC 3339
    pub purchase_date: String,
    pub last_updated_date: Option<String>,
}

impl Order {
    pub fn validate(&self) -> Result<(), String> {
        if self.selling_partner_id.trim().is_empty() {
            return Err("selling_partner_id is required".into());
        }
        if self.amazon_order_id.trim().is_empty() {
            return Err("amazon_order_id is required".into());
        }
        if chrono::DateTime::parse_from_rfc3339(&self.purchase_date).is_err() {
            return Err(format!("purchase_date is not RFC 3339: {}", self.purchase_date));
        }
        Ok(())
    }

    pub fn is_cancelled(&self) -> bool {
        self.order_status.eq_ignore_ascii_case("Cancelled")
            || self.order_status.eq_ignore_ascii_case("Canceled")
    }
}

/// One order line. Natural key: `(selling_partner_id, amazon_order_id, seller_sku)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub account_id: String,
    pub selling_partner_id: String,
    pub amazon_order_id: String,
    pub seller_sku: String,
    pub asin: Option<String>,
    pub quantity_ordered: i64,
    pub item_price: f64,
    pub item_tax: f64,
    pub promotion_discount: f64,
    pub currency: Option<String>,
}

impl OrderItem {
    pub fn validate(&self) -> Result<(), String> {
        if self.amazon_order_id.trim().is_empty() {
            return Err("amazon_order_id is required".into());
        }
        if self.seller_sku.trim().is_empty() {
            return Err("seller_sku is required".into());
        }
        if self.quantity_ordered < 0 {
            return Err("quantity_ordered must not be negative".into());
        }
        Ok(())
    }
}

/// Listing row returned by `GET /api/orders`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderListItem {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}
