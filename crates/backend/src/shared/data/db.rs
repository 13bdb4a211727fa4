use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;

/// Tables and natural-key indexes, created on startup when missing.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS a001_account (
        id TEXT PRIMARY KEY NOT NULL,
        owner_user_id TEXT NOT NULL,
        name TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        deactivated_at TEXT
    );
    "#,
    "CREATE INDEX IF NOT EXISTS idx_a001_owner ON a001_account (owner_user_id);",
    r#"
    CREATE TABLE IF NOT EXISTS a002_seller_connection (
        id TEXT PRIMARY KEY NOT NULL,
        account_id TEXT NOT NULL,
        asp_id TEXT NOT NULL,
        marketplace_id TEXT NOT NULL,
        region TEXT NOT NULL,
        sp_refresh_token TEXT NOT NULL,
        ads_refresh_token TEXT,
        ads_profile_id TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        deactivated_at TEXT
    );
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS uq_a002_key ON a002_seller_connection (account_id, asp_id, marketplace_id);",
    r#"
    CREATE TABLE IF NOT EXISTS a003_order (
        id TEXT PRIMARY KEY NOT NULL,
        account_id TEXT NOT NULL,
        selling_partner_id TEXT NOT NULL,
        marketplace_id TEXT NOT NULL,
        amazon_order_id TEXT NOT NULL,
        order_status TEXT NOT NULL,
        order_total REAL NOT NULL DEFAULT 0,
        currency TEXT,
        sales_channel TEXT,
        fulfillment_channel TEXT,
        ship_city TEXT,
        ship_state TEXT,
        ship_postal_code TEXT,
        ship_country TEXT,
        purchase_date TEXT NOT NULL,
        last_updated_date TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS uq_a003_order_key ON a003_order (selling_partner_id, amazon_order_id);",
    r#"
    CREATE TABLE IF NOT EXISTS a003_order_item (
        id TEXT PRIMARY KEY NOT NULL,
        account_id TEXT NOT NULL,
        selling_partner_id TEXT NOT NULL,
        amazon_order_id TEXT NOT NULL,
        seller_sku TEXT NOT NULL,
        asin TEXT,
        quantity_ordered INTEGER NOT NULL DEFAULT 0,
        item_price REAL NOT NULL DEFAULT 0,
        item_tax REAL NOT NULL DEFAULT 0,
        promotion_discount REAL NOT NULL DEFAULT 0,
        currency TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS uq_a003_item_key ON a003_order_item (selling_partner_id, amazon_order_id, seller_sku);",
    r#"
    CREATE TABLE IF NOT EXISTS a004_sales_traffic_summary (
        id TEXT PRIMARY KEY NOT NULL,
        account_id TEXT NOT NULL,
        asp_id TEXT NOT NULL,
        marketplace_id TEXT NOT NULL,
        date TEXT NOT NULL,
        ordered_product_sales REAL NOT NULL DEFAULT 0,
        currency TEXT,
        units_ordered INTEGER NOT NULL DEFAULT 0,
        total_order_items INTEGER NOT NULL DEFAULT 0,
        page_views INTEGER NOT NULL DEFAULT 0,
        sessions INTEGER NOT NULL DEFAULT 0,
        buy_box_percentage REAL NOT NULL DEFAULT 0,
        breakdown_json TEXT NOT NULL DEFAULT '{}',
        updated_at TEXT NOT NULL
    );
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS uq_a004_summary_key ON a004_sales_traffic_summary (account_id, asp_id, marketplace_id, date);",
    r#"
    CREATE TABLE IF NOT EXISTS a004_sales_traffic_asin (
        id TEXT PRIMARY KEY NOT NULL,
        account_id TEXT NOT NULL,
        asp_id TEXT NOT NULL,
        marketplace_id TEXT NOT NULL,
        date TEXT NOT NULL,
        parent_asin TEXT,
        child_asin TEXT NOT NULL,
        sku TEXT,
        ordered_product_sales REAL NOT NULL DEFAULT 0,
        units_ordered INTEGER NOT NULL DEFAULT 0,
        total_order_items INTEGER NOT NULL DEFAULT 0,
        page_views INTEGER NOT NULL DEFAULT 0,
        sessions INTEGER NOT NULL DEFAULT 0,
        buy_box_percentage REAL NOT NULL DEFAULT 0,
        updated_at TEXT NOT NULL
    );
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS uq_a004_asin_key ON a004_sales_traffic_asin (account_id, asp_id, marketplace_id, child_asin, date);",
    r#"
    CREATE TABLE IF NOT EXISTS a005_settlement (
        id TEXT PRIMARY KEY NOT NULL,
        account_id TEXT NOT NULL,
        selling_partner_id TEXT NOT NULL,
        settlement_id TEXT NOT NULL,
        order_id TEXT NOT NULL,
        order_item_code TEXT NOT NULL,
        sku TEXT,
        transaction_type TEXT NOT NULL,
        amount_type TEXT NOT NULL,
        amount_description TEXT NOT NULL,
        amount REAL NOT NULL DEFAULT 0,
        currency TEXT,
        quantity INTEGER NOT NULL DEFAULT 0,
        posted_date TEXT,
        updated_at TEXT NOT NULL
    );
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS uq_a005_key ON a005_settlement (selling_partner_id, settlement_id, order_id, order_item_code, amount_type, amount_description);",
    r#"
    CREATE TABLE IF NOT EXISTS a006_financial_event (
        id TEXT PRIMARY KEY NOT NULL,
        account_id TEXT NOT NULL,
        asp_id TEXT NOT NULL,
        az_order_id TEXT NOT NULL,
        event_type TEXT NOT NULL,
        event_id TEXT NOT NULL,
        sku TEXT,
        description TEXT,
        amount REAL NOT NULL DEFAULT 0,
        currency TEXT,
        posted_date TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS uq_a006_key ON a006_financial_event (account_id, asp_id, az_order_id, event_type, event_id);",
    r#"
    CREATE TABLE IF NOT EXISTS a007_sponsored_ad (
        id TEXT PRIMARY KEY NOT NULL,
        account_id TEXT NOT NULL,
        asp_id TEXT NOT NULL,
        ad_product TEXT NOT NULL,
        payload_date TEXT NOT NULL,
        campaign_id TEXT NOT NULL,
        campaign_name TEXT,
        ad_group_id TEXT NOT NULL DEFAULT '',
        keyword_id TEXT NOT NULL DEFAULT '',
        asin TEXT NOT NULL DEFAULT '',
        impressions INTEGER NOT NULL DEFAULT 0,
        clicks INTEGER NOT NULL DEFAULT 0,
        cost REAL NOT NULL DEFAULT 0,
        sales REAL NOT NULL DEFAULT 0,
        orders INTEGER NOT NULL DEFAULT 0,
        units INTEGER NOT NULL DEFAULT 0,
        updated_at TEXT NOT NULL
    );
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS uq_a007_key ON a007_sponsored_ad (account_id, asp_id, ad_product, payload_date, campaign_id, ad_group_id, keyword_id, asin);",
    r#"
    CREATE TABLE IF NOT EXISTS a008_amazon_report (
        id TEXT PRIMARY KEY NOT NULL,
        account_id TEXT NOT NULL,
        asp_id TEXT NOT NULL,
        marketplace_id TEXT NOT NULL,
        source TEXT NOT NULL,
        report_type TEXT NOT NULL,
        report_id TEXT NOT NULL,
        status TEXT NOT NULL,
        document_id TEXT,
        data_start_date TEXT NOT NULL,
        data_end_date TEXT NOT NULL,
        rows_ingested INTEGER NOT NULL DEFAULT 0,
        processed_at TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS uq_a008_key ON a008_amazon_report (source, report_id);",
    r#"
    CREATE TABLE IF NOT EXISTS a009_plan (
        id TEXT PRIMARY KEY NOT NULL,
        code TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        price REAL NOT NULL,
        currency TEXT NOT NULL,
        interval_months INTEGER NOT NULL DEFAULT 1,
        is_active INTEGER NOT NULL DEFAULT 1
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS a009_subscription (
        id TEXT PRIMARY KEY NOT NULL,
        account_id TEXT NOT NULL,
        plan_id TEXT NOT NULL,
        status TEXT NOT NULL,
        started_at TEXT,
        ends_at TEXT,
        cancelled_at TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    "#,
    "CREATE INDEX IF NOT EXISTS idx_a009_sub_account ON a009_subscription (account_id, status);",
    r#"
    CREATE TABLE IF NOT EXISTS a009_payment (
        id TEXT PRIMARY KEY NOT NULL,
        account_id TEXT NOT NULL,
        subscription_id TEXT NOT NULL,
        provider_payment_id TEXT NOT NULL,
        amount REAL NOT NULL,
        currency TEXT NOT NULL,
        status TEXT NOT NULL,
        created_at TEXT NOT NULL
    );
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS uq_a009_payment_key ON a009_payment (provider_payment_id);",
    r#"
    CREATE TABLE IF NOT EXISTS a010_fba_return (
        id TEXT PRIMARY KEY NOT NULL,
        account_id TEXT NOT NULL,
        asp_id TEXT NOT NULL,
        order_id TEXT NOT NULL,
        sku TEXT NOT NULL,
        asin TEXT,
        fnsku TEXT,
        product_name TEXT,
        quantity INTEGER NOT NULL DEFAULT 0,
        fulfillment_center_id TEXT,
        detailed_disposition TEXT,
        reason TEXT,
        status TEXT,
        license_plate_number TEXT NOT NULL DEFAULT '',
        return_date TEXT,
        updated_at TEXT NOT NULL
    );
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS uq_a010_key ON a010_fba_return (account_id, asp_id, order_id, sku, license_plate_number);",
    r#"
    CREATE TABLE IF NOT EXISTS a011_product (
        id TEXT PRIMARY KEY NOT NULL,
        account_id TEXT NOT NULL,
        asp_id TEXT NOT NULL,
        asin TEXT NOT NULL,
        sku TEXT,
        title TEXT,
        brand TEXT,
        category TEXT,
        unit_cost REAL NOT NULL DEFAULT 0,
        updated_at TEXT NOT NULL
    );
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS uq_a011_key ON a011_product (account_id, asp_id, asin);",
    r#"
    CREATE TABLE IF NOT EXISTS sys_queue_task (
        id TEXT PRIMARY KEY NOT NULL,
        account_id TEXT NOT NULL,
        task_type TEXT NOT NULL,
        entity_type TEXT NOT NULL,
        payload_json TEXT NOT NULL DEFAULT 'null',
        status TEXT NOT NULL,
        error TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        started_at TEXT,
        finished_at TEXT
    );
    "#,
];

fn build_sqlite_url(path: &Path) -> String {
    let normalized = path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    format!("sqlite://{}{}?mode=rwc", prefix, normalized)
}

/// Open (creating if needed) the sqlite database file and bootstrap the schema
pub async fn initialize_database(db_file: &Path) -> anyhow::Result<DatabaseConnection> {
    if let Some(parent) = db_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if db_file.is_absolute() {
        db_file.to_path_buf()
    } else {
        std::env::current_dir()?.join(db_file)
    };
    let db_url = build_sqlite_url(&absolute_path);
    tracing::info!("Opening database {}", db_url);

    let mut options = ConnectOptions::new(db_url);
    options.sqlx_logging(false);
    let conn = Database::connect(options).await?;

    bootstrap_schema(&conn).await?;
    Ok(conn)
}

pub async fn bootstrap_schema(conn: &DatabaseConnection) -> anyhow::Result<()> {
    let backend = conn.get_database_backend();
    for ddl in SCHEMA {
        conn.execute(Statement::from_string(backend, ddl.to_string()))
            .await?;
    }
    tracing::info!("Database schema ready ({} statements)", SCHEMA.len());
    Ok(())
}

#[cfg(test)]
pub mod test_support {
    use super::*;

    /// Fresh in-memory database with the full schema
    pub async fn memory_db() -> DatabaseConnection {
        let mut options = ConnectOptions::new("sqlite::memory:".to_string());
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);
        let conn = Database::connect(options).await.unwrap();
        bootstrap_schema(&conn).await.unwrap();
        conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_sqlite_url() {
        assert_eq!(
            build_sqlite_url(Path::new("/tmp/app.db")),
            "sqlite:///tmp/app.db?mode=rwc"
        );
        assert_eq!(
            build_sqlite_url(Path::new("C:\\data\\app.db")),
            "sqlite:///C:/data/app.db?mode=rwc"
        );
    }

    #[tokio::test]
    async fn test_bootstrap_is_idempotent() {
        let conn = test_support::memory_db().await;
        bootstrap_schema(&conn).await.unwrap();
    }
}
