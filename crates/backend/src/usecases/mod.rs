pub mod u501_import_from_sp_api;
pub mod u502_import_from_amazon_ads;
