pub mod a001_account;
pub mod a002_seller_connection;
pub mod a003_order;
pub mod a004_sales_traffic;
pub mod a005_settlement;
pub mod a006_financial_event;
pub mod a007_sponsored_ad;
pub mod a008_amazon_report;
pub mod a009_billing;
pub mod a010_fba_return;
pub mod a011_product;
