pub mod d401_sales_overview;
pub mod d402_profit_loss;
pub mod d403_ad_performance;
pub mod d404_marketplace_breakdown;
