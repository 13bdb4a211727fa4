use anyhow::Result;
use contracts::shared::analytics::DashboardQuery;
use sea_orm::{DatabaseConnection, FromQueryResult};

use super::date_range::DateRange;
use super::query_builder::{split_list, Predicates};

/// Tenant scope every aggregation is restricted to
#[derive(Debug, Clone)]
pub struct Scope {
    pub account_id: String,
    pub asp_id: String,
    /// Applied to sources that carry a marketplace column
    pub marketplace_id: Option<String>,
}

/// Optional product filters; an empty list means "no filter"
#[derive(Debug, Clone, Default)]
pub struct MetricFilters {
    pub categories: Vec<String>,
    pub brands: Vec<String>,
    /// ASINs
    pub products: Vec<String>,
}

impl MetricFilters {
    pub fn from_query(query: &DashboardQuery) -> Self {
        Self {
            categories: split_list(query.category.as_deref()),
            brands: split_list(query.brand.as_deref()),
            products: split_list(query.product.as_deref()),
        }
    }

    fn apply(&self, preds: Predicates, asin_column: &str) -> Predicates {
        preds
            .in_list("p.category", &self.categories)
            .in_list("p.brand", &self.brands)
            .in_list(asin_column, &self.products)
    }
}

/// Raw sums over one window. Every field is zero when nothing matched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricSums {
    pub gross_sales: f64,
    pub units_sold: i64,
    pub order_count: i64,
    pub refund: f64,
    pub market_place_fee: f64,
    pub other_fee: f64,
    pub total_cogs: f64,
    pub reimbursement: f64,
    pub ad_spend: f64,
    pub ad_sales: f64,
    pub ad_orders: i64,
    pub impressions: i64,
    pub clicks: i64,
    pub page_views: i64,
    pub sessions: i64,
}

#[derive(Debug, Default, FromQueryResult)]
struct OrderAgg {
    gross_sales: f64,
    units_sold: i64,
    order_count: i64,
    total_cogs: f64,
}

#[derive(Debug, Default, FromQueryResult)]
struct SettlementAgg {
    refund: f64,
    market_place_fee: f64,
    other_fee: f64,
}

#[derive(Debug, Default, FromQueryResult)]
struct ReimbursementAgg {
    reimbursement: f64,
}

#[derive(Debug, Default, FromQueryResult)]
struct AdAgg {
    ad_spend: f64,
    ad_sales: f64,
    ad_orders: i64,
    impressions: i64,
    clicks: i64,
}

#[derive(Debug, Default, FromQueryResult)]
struct TrafficAgg {
    page_views: i64,
    sessions: i64,
}

/// Settlement amount types that are neither sales, fees nor promotions but
/// are accounted elsewhere (financial events, ads) or pass through (tax)
const OTHER_FEE_EXCLUDED: &str =
    "'ItemPrice', 'ItemFees', 'Promotion', 'ItemWithheldTax', 'FBA Inventory Reimbursement', 'Cost of Advertising'";

pub(crate) const ORDER_ITEMS_FROM: &str = r#"
    FROM a003_order_item oi
    JOIN a003_order o
      ON o.selling_partner_id = oi.selling_partner_id
     AND o.amazon_order_id = oi.amazon_order_id
    LEFT JOIN a011_product p
      ON p.account_id = oi.account_id
     AND p.asp_id = oi.selling_partner_id
     AND p.asin = oi.asin
"#;

/// Predicates for non-cancelled order lines purchased inside `range`
pub(crate) fn order_item_predicates(
    scope: &Scope,
    range: &DateRange,
    filters: &MetricFilters,
) -> Predicates {
    let preds = Predicates::new()
        .eq("oi.account_id", &scope.account_id)
        .eq("oi.selling_partner_id", &scope.asp_id)
        .eq_opt("o.marketplace_id", scope.marketplace_id.as_deref())
        .raw("o.order_status NOT IN ('Cancelled', 'Canceled')")
        .date_between("substr(o.purchase_date, 1, 10)", range);
    filters.apply(preds, "oi.asin")
}

async fn order_sums(
    db: &DatabaseConnection,
    scope: &Scope,
    range: &DateRange,
    filters: &MetricFilters,
) -> Result<OrderAgg> {
    let select = format!(
        r#"
        SELECT
            CAST(COALESCE(SUM(oi.item_price), 0) AS REAL)                           AS gross_sales,
            CAST(COALESCE(SUM(oi.quantity_ordered), 0) AS INTEGER)                  AS units_sold,
            CAST(COUNT(DISTINCT oi.amazon_order_id) AS INTEGER)                     AS order_count,
            CAST(COALESCE(SUM(oi.quantity_ordered * COALESCE(p.unit_cost, 0)), 0) AS REAL) AS total_cogs
        {}"#,
        ORDER_ITEMS_FROM
    );
    let stmt = order_item_predicates(scope, range, filters).statement(&select, "");
    Ok(OrderAgg::find_by_statement(stmt)
        .one(db)
        .await?
        .unwrap_or_default())
}

async fn settlement_sums(
    db: &DatabaseConnection,
    scope: &Scope,
    range: &DateRange,
    filters: &MetricFilters,
) -> Result<SettlementAgg> {
    let select = format!(
        r#"
        SELECT
            CAST(COALESCE(SUM(CASE WHEN s.transaction_type = 'Refund' AND s.amount_type = 'ItemPrice'
                                   THEN ABS(s.amount) ELSE 0 END), 0) AS REAL)            AS refund,
            CAST(COALESCE(SUM(CASE WHEN s.amount_type = 'ItemFees'
                                   THEN s.amount ELSE 0 END), 0) AS REAL)                 AS market_place_fee,
            CAST(COALESCE(SUM(CASE WHEN s.amount_type NOT IN ({})
                                   THEN s.amount ELSE 0 END), 0) AS REAL)                 AS other_fee
        FROM a005_settlement s
        LEFT JOIN a011_product p
          ON p.account_id = s.account_id
         AND p.asp_id = s.selling_partner_id
         AND p.sku = s.sku
        "#,
        OTHER_FEE_EXCLUDED
    );
    let preds = Predicates::new()
        .eq("s.account_id", &scope.account_id)
        .eq("s.selling_partner_id", &scope.asp_id)
        .date_between("s.posted_date", range);
    let stmt = filters.apply(preds, "p.asin").statement(&select, "");
    Ok(SettlementAgg::find_by_statement(stmt)
        .one(db)
        .await?
        .unwrap_or_default())
}

async fn reimbursement_sum(
    db: &DatabaseConnection,
    scope: &Scope,
    range: &DateRange,
    filters: &MetricFilters,
) -> Result<ReimbursementAgg> {
    let select = r#"
        SELECT CAST(COALESCE(SUM(f.amount), 0) AS REAL) AS reimbursement
        FROM a006_financial_event f
        LEFT JOIN a011_product p
          ON p.account_id = f.account_id
         AND p.asp_id = f.asp_id
         AND p.sku = f.sku
    "#;
    let preds = Predicates::new()
        .eq("f.account_id", &scope.account_id)
        .eq("f.asp_id", &scope.asp_id)
        .eq("f.event_type", "REIMBURSEMENT")
        .date_between("f.posted_date", range);
    let stmt = filters.apply(preds, "p.asin").statement(select, "");
    Ok(ReimbursementAgg::find_by_statement(stmt)
        .one(db)
        .await?
        .unwrap_or_default())
}

pub(crate) const SPONSORED_ADS_FROM: &str = r#"
    FROM a007_sponsored_ad sa
    LEFT JOIN a011_product p
      ON p.account_id = sa.account_id
     AND p.asp_id = sa.asp_id
     AND p.asin = sa.asin
"#;

pub(crate) fn sponsored_ad_predicates(
    scope: &Scope,
    range: &DateRange,
    filters: &MetricFilters,
) -> Predicates {
    let preds = Predicates::new()
        .eq("sa.account_id", &scope.account_id)
        .eq("sa.asp_id", &scope.asp_id)
        .date_between("sa.payload_date", range);
    filters.apply(preds, "sa.asin")
}

async fn ad_sums(
    db: &DatabaseConnection,
    scope: &Scope,
    range: &DateRange,
    filters: &MetricFilters,
) -> Result<AdAgg> {
    let select = format!(
        r#"
        SELECT
            CAST(COALESCE(SUM(sa.cost), 0) AS REAL)           AS ad_spend,
            CAST(COALESCE(SUM(sa.sales), 0) AS REAL)          AS ad_sales,
            CAST(COALESCE(SUM(sa.orders), 0) AS INTEGER)      AS ad_orders,
            CAST(COALESCE(SUM(sa.impressions), 0) AS INTEGER) AS impressions,
            CAST(COALESCE(SUM(sa.clicks), 0) AS INTEGER)      AS clicks
        {}"#,
        SPONSORED_ADS_FROM
    );
    let stmt = sponsored_ad_predicates(scope, range, filters).statement(&select, "");
    Ok(AdAgg::find_by_statement(stmt)
        .one(db)
        .await?
        .unwrap_or_default())
}

async fn traffic_sums(
    db: &DatabaseConnection,
    scope: &Scope,
    range: &DateRange,
    filters: &MetricFilters,
) -> Result<TrafficAgg> {
    let select = r#"
        SELECT
            CAST(COALESCE(SUM(t.page_views), 0) AS INTEGER) AS page_views,
            CAST(COALESCE(SUM(t.sessions), 0) AS INTEGER)   AS sessions
        FROM a004_sales_traffic_asin t
        LEFT JOIN a011_product p
          ON p.account_id = t.account_id
         AND p.asp_id = t.asp_id
         AND p.asin = t.child_asin
    "#;
    let preds = Predicates::new()
        .eq("t.account_id", &scope.account_id)
        .eq("t.asp_id", &scope.asp_id)
        .eq_opt("t.marketplace_id", scope.marketplace_id.as_deref())
        .date_between("t.date", range);
    let stmt = filters.apply(preds, "t.child_asin").statement(select, "");
    Ok(TrafficAgg::find_by_statement(stmt)
        .one(db)
        .await?
        .unwrap_or_default())
}

/// Sums every dashboard metric over `range`. Read-only.
pub async fn aggregate(
    db: &DatabaseConnection,
    scope: &Scope,
    range: &DateRange,
    filters: &MetricFilters,
) -> Result<MetricSums> {
    let orders = order_sums(db, scope, range, filters).await?;
    let settlements = settlement_sums(db, scope, range, filters).await?;
    let reimbursements = reimbursement_sum(db, scope, range, filters).await?;
    let ads = ad_sums(db, scope, range, filters).await?;
    let traffic = traffic_sums(db, scope, range, filters).await?;

    Ok(MetricSums {
        gross_sales: orders.gross_sales,
        units_sold: orders.units_sold,
        order_count: orders.order_count,
        refund: settlements.refund,
        market_place_fee: settlements.market_place_fee,
        other_fee: settlements.other_fee,
        total_cogs: orders.total_cogs,
        reimbursement: reimbursements.reimbursement,
        ad_spend: ads.ad_spend,
        ad_sales: ads.ad_sales,
        ad_orders: ads.ad_orders,
        impressions: ads.impressions,
        clicks: ads.clicks,
        page_views: traffic.page_views,
        sessions: traffic.sessions,
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::NaiveDate;
    use contracts::domain::a003_order::aggregate::{Order, OrderItem};
    use contracts::domain::a005_settlement::aggregate::SettlementLine;
    use contracts::domain::a007_sponsored_ad::aggregate::SponsoredAd;
    use contracts::domain::a011_product::aggregate::Product;
    use contracts::enums::report_type::AdProduct;
    use sea_orm::DatabaseConnection;

    use crate::domain::{a003_order, a005_settlement, a007_sponsored_ad, a011_product};

    pub const ACCOUNT: &str = "acc-1";
    pub const SELLER: &str = "A1SELLER";
    pub const US: &str = "ATVPDKIKX0DER";

    pub fn order(id: &str, date: &str, status: &str, marketplace: &str) -> Order {
        Order {
            account_id: ACCOUNT.into(),
            selling_partner_id: SELLER.into(),
            marketplace_id: marketplace.into(),
            amazon_order_id: id.into(),
            order_status: status.into(),
            order_total: 0.0,
            currency: Some("USD".into()),
            sales_channel: Some("Amazon.com".into()),
            fulfillment_channel: Some("Amazon".into()),
            ship_city: None,
            ship_state: None,
            ship_postal_code: None,
            ship_country: Some("US".into()),
            purchase_date: format!("{}T10:00:00+00:00", date),
            last_updated_date: None,
        }
    }

    pub fn item(order_id: &str, sku: &str, asin: &str, qty: i64, price: f64) -> OrderItem {
        OrderItem {
            account_id: ACCOUNT.into(),
            selling_partner_id: SELLER.into(),
            amazon_order_id: order_id.into(),
            seller_sku: sku.into(),
            asin: Some(asin.into()),
            quantity_ordered: qty,
            item_price: price,
            item_tax: 0.0,
            promotion_discount: 0.0,
            currency: Some("USD".into()),
        }
    }

    pub fn product(asin: &str, sku: &str, category: &str, brand: &str, unit_cost: f64) -> Product {
        Product {
            account_id: ACCOUNT.into(),
            asp_id: SELLER.into(),
            asin: asin.into(),
            sku: Some(sku.into()),
            title: None,
            brand: Some(brand.into()),
            category: Some(category.into()),
            unit_cost,
        }
    }

    pub fn settlement(
        order_id: &str,
        sku: &str,
        transaction_type: &str,
        amount_type: &str,
        description: &str,
        amount: f64,
        date: NaiveDate,
    ) -> SettlementLine {
        SettlementLine {
            account_id: ACCOUNT.into(),
            selling_partner_id: SELLER.into(),
            settlement_id: "S-1".into(),
            order_id: order_id.into(),
            order_item_code: format!("{}-{}", order_id, sku),
            sku: Some(sku.into()),
            transaction_type: transaction_type.into(),
            amount_type: amount_type.into(),
            amount_description: description.into(),
            amount,
            currency: Some("USD".into()),
            quantity: 1,
            posted_date: Some(date),
        }
    }

    pub fn ad(asin: &str, date: NaiveDate, cost: f64, sales: f64) -> SponsoredAd {
        SponsoredAd {
            account_id: ACCOUNT.into(),
            asp_id: SELLER.into(),
            ad_product: AdProduct::SponsoredProducts,
            payload_date: date,
            campaign_id: "C-1".into(),
            campaign_name: Some("Launch".into()),
            ad_group_id: "G-1".into(),
            keyword_id: String::new(),
            asin: asin.into(),
            impressions: 1000,
            clicks: 20,
            cost,
            sales,
            orders: 2,
            units: 2,
        }
    }

    /// Two orders in June 2023: one Kitchen line, one Garden line, plus a
    /// cancelled order that must never count
    pub async fn seed_june(db: &DatabaseConnection) {
        let day = NaiveDate::from_ymd_opt(2023, 6, 17).unwrap();
        a011_product::repository::upsert(db, &product("B0KITCHEN", "SKU-K", "Kitchen", "Acme", 4.0))
            .await
            .unwrap();
        a011_product::repository::upsert(db, &product("B0GARDEN", "SKU-G", "Garden", "Zeta", 10.0))
            .await
            .unwrap();

        a003_order::repository::upsert_order(db, &order("111-1", "2023-06-17", "Shipped", US))
            .await
            .unwrap();
        a003_order::repository::upsert_item(db, &item("111-1", "SKU-K", "B0KITCHEN", 2, 40.0))
            .await
            .unwrap();
        a003_order::repository::upsert_order(db, &order("111-2", "2023-06-18", "Shipped", US))
            .await
            .unwrap();
        a003_order::repository::upsert_item(db, &item("111-2", "SKU-G", "B0GARDEN", 1, 60.0))
            .await
            .unwrap();
        a003_order::repository::upsert_order(db, &order("111-3", "2023-06-18", "Cancelled", US))
            .await
            .unwrap();
        a003_order::repository::upsert_item(db, &item("111-3", "SKU-G", "B0GARDEN", 5, 300.0))
            .await
            .unwrap();

        for line in [
            settlement("111-1", "SKU-K", "Order", "ItemFees", "Commission", -6.0, day),
            settlement("111-1", "SKU-K", "Order", "ItemFees", "FBAPerUnitFulfillmentFee", -3.0, day),
            settlement("111-2", "SKU-G", "Refund", "ItemPrice", "Principal", -60.0, day),
            settlement("111-2", "SKU-G", "other-transaction", "other-transaction", "Storage Fee", -2.0, day),
        ] {
            a005_settlement::repository::upsert(db, &line).await.unwrap();
        }

        a007_sponsored_ad::repository::upsert(db, &ad("B0KITCHEN", day, 5.0, 40.0))
            .await
            .unwrap();
    }
}
