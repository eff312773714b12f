pub mod api;
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod logging;
pub mod market_value;
pub mod metric_catalog;
pub mod normalize;
pub mod position;
pub mod service;
pub mod similarity;
