//! Comparative metrics: resolve windows, aggregate sums, compare.

pub mod aggregator;
pub mod date_range;
pub mod growth;
pub mod profit_loss;
pub mod query_builder;
